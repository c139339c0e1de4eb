pub mod base;
pub mod base_traits;
mod context;
pub mod error;
pub mod reminder_dao;

pub use base::DaoBase;
pub use base_traits::{HasIdActiveModel, TimestampedActiveModel};
pub use context::DaoContext;
pub use error::{DaoLayerError, DaoResult};
pub use reminder_dao::ReminderDao;
