use sea_orm::{ActiveValue::Set, entity::prelude::*};

use crate::{
    db::dao::base_traits::{HasIdActiveModel, TimestampedActiveModel},
    models::{self, Priority, ValidationError},
};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reminders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub created_at: DateTimeWithTimeZone,
    #[sea_orm(default_expr = "Expr::current_timestamp()")]
    pub updated_at: DateTimeWithTimeZone,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(indexed)]
    pub date: Date,
    pub time: String,
    pub priority: String,
    #[sea_orm(default_value = "general")]
    pub category: String,
    #[sea_orm(default_value = false)]
    pub completed: bool,
}

impl ActiveModelBehavior for ActiveModel {}

impl HasIdActiveModel for ActiveModel {
    fn set_id(&mut self, id: Uuid) {
        self.id = Set(id);
    }
}

impl TimestampedActiveModel for ActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone) {
        self.created_at = Set(ts);
    }

    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone) {
        self.updated_at = Set(ts);
    }
}

impl TryFrom<Model> for models::Reminder {
    type Error = ValidationError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            name: model.name,
            description: model.description,
            date: model.date,
            time: model.time,
            priority: model.priority.parse::<Priority>()?,
            category: model.category,
            completed: model.completed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
