use sea_orm::entity::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

/// Storage assigns ids; the DAO sets them right before insert.
pub trait HasIdActiveModel {
    fn set_id(&mut self, id: Uuid);
}

pub trait TimestampedActiveModel {
    fn set_created_at(&mut self, ts: DateTimeWithTimeZone);
    fn set_updated_at(&mut self, ts: DateTimeWithTimeZone);
}
