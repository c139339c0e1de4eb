#[allow(unused_imports)]
pub mod prelude {
    pub use super::reminder::Entity as Reminder;
}

pub mod reminder;
