use sea_orm::DatabaseConnection;

use super::{DaoBase, ReminderDao};

#[derive(Clone)]
pub struct DaoContext {
    db: DatabaseConnection,
}

impl DaoContext {
    pub fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    pub fn reminder(&self) -> ReminderDao {
        ReminderDao::new(&self.db)
    }
}
