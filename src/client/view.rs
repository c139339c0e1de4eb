use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Priority, Reminder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewFilter {
    #[default]
    All,
    Today,
    High,
    Medium,
    Low,
    Pending,
    Completed,
}

impl ViewFilter {
    /// In the order the filter menu lists them.
    pub const ALL_FILTERS: [ViewFilter; 7] = [
        ViewFilter::All,
        ViewFilter::Today,
        ViewFilter::High,
        ViewFilter::Medium,
        ViewFilter::Low,
        ViewFilter::Pending,
        ViewFilter::Completed,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ViewFilter::All => "all",
            ViewFilter::Today => "today",
            ViewFilter::High => "high",
            ViewFilter::Medium => "medium",
            ViewFilter::Low => "low",
            ViewFilter::Pending => "pending",
            ViewFilter::Completed => "completed",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewFilter::All => "All Reminders",
            ViewFilter::Today => "Today",
            ViewFilter::High => "High Priority",
            ViewFilter::Medium => "Medium Priority",
            ViewFilter::Low => "Low Priority",
            ViewFilter::Pending => "Pending",
            ViewFilter::Completed => "Completed",
        }
    }

    fn matches(self, reminder: &Reminder, today: NaiveDate) -> bool {
        match self {
            ViewFilter::All => true,
            ViewFilter::Today => reminder.date == today,
            ViewFilter::High => reminder.priority == Priority::High,
            ViewFilter::Medium => reminder.priority == Priority::Medium,
            ViewFilter::Low => reminder.priority == Priority::Low,
            ViewFilter::Pending => !reminder.completed,
            ViewFilter::Completed => reminder.completed,
        }
    }
}

impl fmt::Display for ViewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter '{0}'")]
pub struct UnknownFilter(pub String);

impl FromStr for ViewFilter {
    type Err = UnknownFilter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL_FILTERS
            .into_iter()
            .find(|filter| filter.id() == value)
            .ok_or_else(|| UnknownFilter(value.to_string()))
    }
}

/// What the user has selected: search text, filter, optional single day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_query: String,
    pub filter: ViewFilter,
    pub date_filter_active: bool,
    pub selected_date: NaiveDate,
}

impl ViewState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            search_query: String::new(),
            filter: ViewFilter::All,
            date_filter_active: false,
            selected_date: today,
        }
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_filter(&mut self, filter: ViewFilter) {
        self.filter = filter;
    }

    /// Picking a calendar day also turns the date restriction on.
    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
        self.date_filter_active = true;
    }

    pub fn clear_date_filter(&mut self, today: NaiveDate) {
        self.date_filter_active = false;
        self.selected_date = today;
    }

    pub fn describe_selection(&self) -> String {
        if self.date_filter_active {
            format!(
                "Showing reminders for {}",
                self.selected_date.format("%B %-d, %Y")
            )
        } else {
            "Manage your tasks and reminders".to_string()
        }
    }
}

/// The visible reminders for `state`, earliest due first.
///
/// Reminders sharing a date and time keep their input order. A time that is
/// not `HH:MM` sorts ahead of valid times on the same day. `today` decides
/// membership for [`ViewFilter::Today`].
pub fn derive_view<'a>(
    reminders: &'a [Reminder],
    state: &ViewState,
    today: NaiveDate,
) -> Vec<&'a Reminder> {
    let query = state.search_query.to_lowercase();

    let mut visible: Vec<&Reminder> = reminders
        .iter()
        .filter(|reminder| query.is_empty() || matches_search(reminder, &query))
        .filter(|reminder| !state.date_filter_active || reminder.date == state.selected_date)
        .filter(|reminder| state.filter.matches(reminder, today))
        .collect();

    visible.sort_by_key(|reminder| (reminder.date, reminder.time_of_day()));
    visible
}

fn matches_search(reminder: &Reminder, query: &str) -> bool {
    [&reminder.name, &reminder.description, &reminder.category]
        .into_iter()
        .any(|field| field.to_lowercase().contains(query))
}

/// Days holding at least one reminder; the calendar only enables these.
pub fn dates_with_reminders(reminders: &[Reminder]) -> BTreeSet<NaiveDate> {
    reminders.iter().map(|reminder| reminder.date).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;

    use super::{ViewFilter, ViewState, dates_with_reminders, derive_view};
    use crate::models::{Priority, Reminder};
    use crate::test_helpers::sample_reminder;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).expect("valid date")
    }

    fn reminder(
        name: &str,
        date: NaiveDate,
        time: &str,
        priority: Priority,
        completed: bool,
    ) -> Reminder {
        let mut reminder = sample_reminder(name, date, time);
        reminder.priority = priority;
        reminder.completed = completed;
        reminder
    }

    fn scenario() -> Vec<Reminder> {
        vec![
            reminder("A", day(2), "09:00", Priority::High, false),
            reminder("B", day(1), "09:00", Priority::Low, true),
        ]
    }

    fn names(view: &[&Reminder]) -> Vec<String> {
        view.iter().map(|reminder| reminder.name.clone()).collect()
    }

    fn view_with(filter: ViewFilter) -> ViewState {
        let mut state = ViewState::new(day(15));
        state.set_filter(filter);
        state
    }

    #[test]
    fn all_filter_sorts_by_date() {
        let list = scenario();
        let view = derive_view(&list, &view_with(ViewFilter::All), day(15));
        assert_eq!(names(&view), ["B", "A"]);
    }

    #[test]
    fn high_filter_keeps_high_priority() {
        let list = scenario();
        let view = derive_view(&list, &view_with(ViewFilter::High), day(15));
        assert_eq!(names(&view), ["A"]);
    }

    #[test]
    fn completed_filter_keeps_completed() {
        let list = scenario();
        let view = derive_view(&list, &view_with(ViewFilter::Completed), day(15));
        assert_eq!(names(&view), ["B"]);
    }

    #[test]
    fn pending_and_completed_partition_the_list() {
        let list = vec![
            reminder("a", day(3), "10:00", Priority::Low, false),
            reminder("b", day(1), "08:00", Priority::High, true),
            reminder("c", day(2), "12:00", Priority::Medium, false),
            reminder("d", day(2), "07:00", Priority::Medium, true),
        ];
        let pending: HashSet<_> = derive_view(&list, &view_with(ViewFilter::Pending), day(15))
            .into_iter()
            .map(|reminder| reminder.id)
            .collect();
        let completed: HashSet<_> = derive_view(&list, &view_with(ViewFilter::Completed), day(15))
            .into_iter()
            .map(|reminder| reminder.id)
            .collect();
        let everything: HashSet<_> = list.iter().map(|reminder| reminder.id).collect();

        assert!(pending.is_disjoint(&completed));
        assert_eq!(&pending | &completed, everything);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut milk = sample_reminder("Buy milk", day(1), "09:00");
        milk.description = "corner shop".to_string();
        let mut call = sample_reminder("Call mom", day(1), "10:00");
        call.category = "Family".to_string();
        let mut taxes = sample_reminder("Taxes", day(1), "11:00");
        taxes.description = "Fill the FORMS".to_string();
        let list = vec![milk, call, taxes];

        let mut state = ViewState::new(day(15));
        state.set_search("MILK");
        assert_eq!(names(&derive_view(&list, &state, day(15))), ["Buy milk"]);

        state.set_search("family");
        assert_eq!(names(&derive_view(&list, &state, day(15))), ["Call mom"]);

        state.set_search("forms");
        assert_eq!(names(&derive_view(&list, &state, day(15))), ["Taxes"]);

        state.set_search("nothing like this");
        assert!(derive_view(&list, &state, day(15)).is_empty());
    }

    #[test]
    fn date_filter_and_today_filter() {
        let list = vec![
            sample_reminder("first", day(1), "09:00"),
            sample_reminder("second", day(2), "09:00"),
            sample_reminder("third", day(2), "08:00"),
        ];

        let mut state = ViewState::new(day(1));
        state.select_date(day(2));
        assert_eq!(names(&derive_view(&list, &state, day(1))), ["third", "second"]);

        state.clear_date_filter(day(1));
        state.set_filter(ViewFilter::Today);
        assert_eq!(names(&derive_view(&list, &state, day(1))), ["first"]);
    }

    #[test]
    fn output_is_sorted_subset_and_idempotent() {
        let list = vec![
            sample_reminder("late", day(5), "23:59"),
            sample_reminder("early", day(5), "00:01"),
            sample_reminder("middle", day(3), "12:00"),
            sample_reminder("broken", day(5), "soon"),
        ];
        let state = ViewState::new(day(15));

        let first = derive_view(&list, &state, day(15));
        let second = derive_view(&list, &state, day(15));
        assert_eq!(first, second);
        assert!(first.iter().all(|shown| list.iter().any(|r| r.id == shown.id)));
        assert!(first.windows(2).all(|pair| {
            (pair[0].date, pair[0].time_of_day()) <= (pair[1].date, pair[1].time_of_day())
        }));
        assert_eq!(names(&first), ["middle", "broken", "early", "late"]);
    }

    #[test]
    fn equal_due_times_keep_input_order() {
        let list = vec![
            sample_reminder("one", day(1), "09:00"),
            sample_reminder("two", day(1), "09:00"),
        ];
        let view = derive_view(&list, &ViewState::new(day(15)), day(15));
        assert_eq!(names(&view), ["one", "two"]);
    }

    #[test]
    fn empty_input_gives_empty_view() {
        assert!(derive_view(&[], &ViewState::new(day(1)), day(1)).is_empty());
    }

    #[test]
    fn filter_ids_round_trip_and_unknown_ids_fail() {
        for filter in ViewFilter::ALL_FILTERS {
            assert_eq!(filter.id().parse::<ViewFilter>(), Ok(filter));
        }
        assert!("overdue".parse::<ViewFilter>().is_err());
        assert_eq!(ViewFilter::High.label(), "High Priority");
    }

    #[test]
    fn selection_heading_and_calendar_days() {
        let mut state = ViewState::new(day(1));
        assert_eq!(state.describe_selection(), "Manage your tasks and reminders");

        state.select_date(day(2));
        assert_eq!(state.describe_selection(), "Showing reminders for January 2, 2024");

        let list = vec![
            sample_reminder("a", day(2), "09:00"),
            sample_reminder("b", day(2), "10:00"),
            sample_reminder("c", day(9), "10:00"),
        ];
        let days: Vec<_> = dates_with_reminders(&list).into_iter().collect();
        assert_eq!(days, [day(2), day(9)]);
    }
}
