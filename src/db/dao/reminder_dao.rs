use sea_orm::{DatabaseConnection, QueryOrder, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::Reminder, reminder};
use crate::models::{DEFAULT_CATEGORY, NewReminder, ReminderChanges};

#[derive(Clone)]
pub struct ReminderDao {
    db: DatabaseConnection,
}

impl DaoBase for ReminderDao {
    type Entity = Reminder;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl ReminderDao {
    /// All reminders, earliest due first.
    pub async fn list_by_due(&self) -> DaoResult<Vec<reminder::Model>> {
        self.find_all(|query| {
            query
                .order_by_asc(reminder::Column::Date)
                .order_by_asc(reminder::Column::Time)
                .order_by_asc(reminder::Column::CreatedAt)
        })
        .await
    }

    pub async fn create_reminder(&self, input: NewReminder) -> DaoResult<reminder::Model> {
        let model = reminder::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            date: Set(input.date),
            time: Set(input.time),
            priority: Set(input.priority.as_str().to_string()),
            category: Set(input
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())),
            completed: Set(false),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn update_reminder(
        &self,
        id: &Uuid,
        changes: ReminderChanges,
    ) -> DaoResult<reminder::Model> {
        self.update(*id, move |active| {
            if let Some(name) = changes.name {
                active.name = Set(name);
            }
            if let Some(description) = changes.description {
                active.description = Set(description);
            }
            if let Some(date) = changes.date {
                active.date = Set(date);
            }
            if let Some(time) = changes.time {
                active.time = Set(time);
            }
            if let Some(priority) = changes.priority {
                active.priority = Set(priority.as_str().to_string());
            }
            if let Some(category) = changes.category {
                active.category = Set(category);
            }
            if let Some(completed) = changes.completed {
                active.completed = Set(completed);
            }
        })
        .await
    }

    pub async fn delete_reminder(&self, id: &Uuid) -> DaoResult<Uuid> {
        self.delete(*id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use super::ReminderDao;
    use crate::db::dao::{DaoBase, DaoLayerError};
    use crate::db::entities::reminder;
    use crate::models::{NewReminder, Priority, ReminderChanges};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn reminder_model(id: Uuid, name: &str, category: &str, completed: bool) -> reminder::Model {
        let now = ts();
        reminder::Model {
            id,
            created_at: now,
            updated_at: now,
            name: name.to_string(),
            description: "details".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            time: "09:00".to_string(),
            priority: "MEDIUM".to_string(),
            category: category.to_string(),
            completed,
        }
    }

    #[tokio::test]
    async fn create_reminder_returns_inserted_row() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[reminder_model(id, "X", "general", false)]])
            .into_connection();
        let dao = ReminderDao::new(&db);

        let created = dao
            .create_reminder(NewReminder {
                name: "X".to_string(),
                description: "Y".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
                time: "09:00".to_string(),
                priority: Priority::Medium,
                category: None,
            })
            .await
            .expect("insert should succeed");

        assert_eq!(created.id, id);
        assert_eq!(created.category, "general");
        assert!(!created.completed);
    }

    #[tokio::test]
    async fn update_reminder_reports_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<reminder::Model>::new()])
            .into_connection();
        let dao = ReminderDao::new(&db);

        let err = dao
            .update_reminder(
                &Uuid::new_v4(),
                ReminderChanges {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .expect_err("missing row should fail");
        assert!(matches!(err, DaoLayerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn update_reminder_returns_updated_row() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                [reminder_model(id, "X", "general", false)],
                [reminder_model(id, "X", "general", true)],
            ])
            .into_connection();
        let dao = ReminderDao::new(&db);

        let updated = dao
            .update_reminder(
                &id,
                ReminderChanges {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .expect("update should succeed");
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn delete_reminder_reports_missing_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let dao = ReminderDao::new(&db);

        let err = dao
            .delete_reminder(&Uuid::new_v4())
            .await
            .expect_err("missing row should fail");
        assert!(matches!(err, DaoLayerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_by_due_maps_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("list failed".to_string())])
            .into_connection();
        let dao = ReminderDao::new(&db);

        let err = dao.list_by_due().await.expect_err("list should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }
}
