use sea_orm::entity::prelude::*;

use crate::{crud::IdModel, types::TaskStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "task")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    pub name: String,
    pub code: i32,
    pub description: String,
    pub deadline: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub assignee_user_id: i64,
    pub status: TaskStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl IdModel for Model {
    fn id(&self) -> i32 {
        self.id
    }
}
