use std::{fmt, str::FromStr};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CATEGORY: &str = "general";
pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "HIGH" => Ok(Priority::High),
            "MEDIUM" => Ok(Priority::Medium),
            "LOW" => Ok(Priority::Low),
            other => Err(ValidationError::InvalidPriority(other.to_string())),
        }
    }
}

/// A reminder as it travels over the wire and lives in client state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub priority: Priority,
    pub category: String,
    pub completed: bool,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl Reminder {
    /// Time of day, `None` when the stored text is not `HH:MM`.
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.time, TIME_FORMAT).ok()
    }

    /// Fields needed to create this reminder again under a fresh id. New
    /// reminders always start pending, so completion is not carried over.
    pub fn to_new(&self) -> NewReminder {
        NewReminder {
            name: self.name.clone(),
            description: self.description.clone(),
            date: self.date,
            time: self.time.clone(),
            priority: self.priority,
            category: Some(self.category.clone()),
        }
    }

    /// Every mutable field, with `completed` replaced.
    pub fn with_completed(&self, completed: bool) -> ReminderChanges {
        ReminderChanges {
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            date: Some(self.date),
            time: Some(self.time.clone()),
            priority: Some(self.priority),
            category: Some(self.category.clone()),
            completed: Some(completed),
        }
    }
}

/// Create payload. `category` falls back to [`DEFAULT_CATEGORY`]; a created
/// reminder is never completed, and a `completed` field in the body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReminder {
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl NewReminder {
    /// Checks required fields and returns the payload with trimmed text,
    /// canonical `HH:MM` time and the category default applied.
    pub fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: normalize_name(&self.name)?,
            description: self.description.trim().to_string(),
            date: self.date,
            time: normalize_time(&self.time)?,
            priority: self.priority,
            category: Some(normalize_category(self.category.as_deref())),
        })
    }
}

/// Update payload; absent fields are left untouched. Unknown fields such as
/// `id` or `createdAt` are ignored so a full reminder can be echoed back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl ReminderChanges {
    pub fn validated(self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: self.name.as_deref().map(normalize_name).transpose()?,
            description: self.description.map(|value| value.trim().to_string()),
            date: self.date,
            time: self.time.as_deref().map(normalize_time).transpose()?,
            priority: self.priority,
            category: self
                .category
                .as_deref()
                .map(|value| normalize_category(Some(value))),
            completed: self.completed,
        })
    }

    /// Applies the present fields to a local copy of a reminder.
    pub fn apply_to(&self, reminder: &mut Reminder) {
        if let Some(name) = &self.name {
            reminder.name = name.clone();
        }
        if let Some(description) = &self.description {
            reminder.description = description.clone();
        }
        if let Some(date) = self.date {
            reminder.date = date;
        }
        if let Some(time) = &self.time {
            reminder.time = time.clone();
        }
        if let Some(priority) = self.priority {
            reminder.priority = priority;
        }
        if let Some(category) = &self.category {
            reminder.category = category.clone();
        }
        if let Some(completed) = self.completed {
            reminder.completed = completed;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name required")]
    EmptyName,
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("Invalid priority '{0}', expected HIGH, MEDIUM or LOW")]
    InvalidPriority(String),
}

fn normalize_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn normalize_time(time: &str) -> Result<String, ValidationError> {
    NaiveTime::parse_from_str(time.trim(), TIME_FORMAT)
        .map(|parsed| parsed.format(TIME_FORMAT).to_string())
        .map_err(|_| ValidationError::InvalidTime(time.to_string()))
}

fn normalize_category(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}
