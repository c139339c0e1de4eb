pub mod context;
pub mod reminder_service;

pub use context::ServiceContext;
pub use reminder_service::ReminderService;
