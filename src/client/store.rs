use uuid::Uuid;

use crate::models::Reminder;

/// One record as it was before an optimistic change, with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    index: usize,
    reminder: Reminder,
}

impl Snapshot {
    pub fn reminder(&self) -> &Reminder {
        &self.reminder
    }
}

/// The client's single copy of the reminder list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderStore {
    reminders: Vec<Reminder>,
}

impl ReminderStore {
    pub fn new(reminders: Vec<Reminder>) -> Self {
        Self { reminders }
    }

    pub fn all(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn replace_all(&mut self, reminders: Vec<Reminder>) {
        self.reminders = reminders;
    }

    pub fn get(&self, id: Uuid) -> Option<&Reminder> {
        self.reminders.iter().find(|reminder| reminder.id == id)
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.reminders.iter().position(|reminder| reminder.id == id)
    }

    /// Mutates one record in place and returns what it looked like before.
    pub fn apply_patch(
        &mut self,
        id: Uuid,
        patch: impl FnOnce(&mut Reminder),
    ) -> Option<Snapshot> {
        let index = self.position(id)?;
        let reminder = &mut self.reminders[index];
        let snapshot = Snapshot {
            index,
            reminder: reminder.clone(),
        };
        patch(reminder);
        Some(snapshot)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Snapshot> {
        let index = self.position(id)?;
        let reminder = self.reminders.remove(index);
        Some(Snapshot { index, reminder })
    }

    /// Puts the snapshotted record back: replaced in place if still present,
    /// otherwise reinserted at its old position (clamped to the list end).
    /// Other records are left as they are.
    pub fn rollback(&mut self, snapshot: Snapshot) {
        match self.position(snapshot.reminder.id) {
            Some(index) => self.reminders[index] = snapshot.reminder,
            None => {
                let index = snapshot.index.min(self.reminders.len());
                self.reminders.insert(index, snapshot.reminder);
            }
        }
    }
}
