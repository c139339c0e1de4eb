mod entry;
pub mod health;
pub mod reminders;

pub use entry::{API_PREFIX, router};
