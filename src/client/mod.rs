//! Client-side reminder state: the HTTP collaborator, the owned reminder
//! list, the derived view and the optimistic mutation coordinator.

pub mod api;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod notify;
pub mod store;
pub mod view;

pub use api::{HttpReminderApi, ReminderApi};
pub use config::ClientConfig;
pub use coordinator::ReminderCoordinator;
pub use error::ClientError;
pub use notify::{Notifier, TracingNotifier, UndoToken};
pub use store::{ReminderStore, Snapshot};
pub use view::{ViewFilter, ViewState, dates_with_reminders, derive_view};
