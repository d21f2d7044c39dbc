use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

pub use crate::types::TaskStatus;
use crate::{
    crud::Id,
    entities::task,
    error::{AppError, EntityKind},
    repo::{Record, Repo},
    types::{Page, Pagination},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<Id>,
    pub project_id: Id,
    pub name: String,
    pub code: i32,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub assignee_user_id: i64,
    pub status: TaskStatus,
}

impl Task {
    pub fn new(
        project_id: Id,
        name: impl Into<String>,
        code: i32,
        description: impl Into<String>,
        deadline: DateTime<Utc>,
        assignee_user_id: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            project_id,
            name: name.into(),
            code,
            description: description.into(),
            deadline,
            created_at,
            assignee_user_id,
            status: TaskStatus::default(),
        }
    }
}

impl Record for Task {
    type Entity = task::Entity;
    type ActiveModel = task::ActiveModel;

    const KIND: EntityKind = EntityKind::Task;

    fn id(&self) -> Option<Id> {
        self.id
    }

    fn from_model(model: task::Model) -> Self {
        Self {
            id: Some(model.id),
            project_id: model.project_id,
            name: model.name,
            code: model.code,
            description: model.description,
            deadline: model.deadline,
            created_at: model.created_at,
            assignee_user_id: model.assignee_user_id,
            status: model.status,
        }
    }

    fn into_active_model(self) -> task::ActiveModel {
        task::ActiveModel {
            id: self.id.map_or(NotSet, Set),
            project_id: Set(self.project_id),
            name: Set(self.name),
            code: Set(self.code),
            description: Set(self.description),
            deadline: Set(self.deadline),
            created_at: Set(self.created_at),
            assignee_user_id: Set(self.assignee_user_id),
            status: Set(self.status),
        }
    }
}

pub type TaskRepo = Repo<Task>;

impl TaskRepo {
    pub async fn get_by_project_id<C: ConnectionTrait>(
        db: &C,
        project_id: Id,
        pagination: &Pagination,
    ) -> Result<Page<Task>, AppError> {
        Self::get_page(db, &vec![("project_id", project_id.into())], pagination).await
    }

    pub async fn get_by_assignee_user_id<C: ConnectionTrait>(
        db: &C,
        assignee_user_id: i64,
        pagination: &Pagination,
    ) -> Result<Page<Task>, AppError> {
        Self::get_page(
            db,
            &vec![("assignee_user_id", assignee_user_id.into())],
            pagination,
        )
        .await
    }

    pub async fn get_by_code_and_project_id<C: ConnectionTrait>(
        db: &C,
        code: i32,
        project_id: Id,
    ) -> Result<Option<Task>, AppError> {
        let model = task::Entity::find()
            .filter(task::Column::Code.eq(code))
            .filter(task::Column::ProjectId.eq(project_id))
            .one(db)
            .await?;
        Ok(model.map(Task::from_model))
    }

    /// Codes are a per-project sequence: one past the highest code ever
    /// assigned in the project, starting at 1. Deleted codes are not
    /// reused.
    pub async fn next_code_for_project<C: ConnectionTrait>(
        db: &C,
        project_id: Id,
    ) -> Result<i32, AppError> {
        let highest: Option<i32> = task::Entity::find()
            .select_only()
            .column(task::Column::Code)
            .filter(task::Column::ProjectId.eq(project_id))
            .order_by_desc(task::Column::Code)
            .into_tuple()
            .one(db)
            .await?;
        Ok(highest.map_or(1, |code| code + 1))
    }

    /// Tasks whose deadline falls within `[now, now + days]`, soonest
    /// first.
    pub async fn get_with_deadline_within<C: ConnectionTrait>(
        db: &C,
        now: DateTime<Utc>,
        days: i64,
    ) -> Result<Vec<Task>, AppError> {
        let until = now + Duration::days(days);
        let models = task::Entity::find()
            .filter(task::Column::Deadline.gte(now))
            .filter(task::Column::Deadline.lte(until))
            .order_by_asc(task::Column::Deadline)
            .all(db)
            .await?;
        Ok(models.into_iter().map(Task::from_model).collect())
    }
}
