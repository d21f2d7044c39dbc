use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::{
    crud::Id,
    entities::employee,
    error::{AppError, EntityKind},
    repo::{Record, Repo},
    types::{Page, Pagination},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Employee {
    pub id: Option<Id>,
    pub telegram_id: i64,
    pub company_id: Id,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub salary_per_hour: f64,
    pub display_name: String,
}

impl Employee {
    /// New memberships always start active.
    pub fn new(
        company_id: Id,
        telegram_id: i64,
        display_name: impl Into<String>,
        salary_per_hour: f64,
        is_admin: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            telegram_id,
            company_id,
            is_active: true,
            is_admin,
            created_at,
            salary_per_hour,
            display_name: display_name.into(),
        }
    }
}

impl Record for Employee {
    type Entity = employee::Entity;
    type ActiveModel = employee::ActiveModel;

    const KIND: EntityKind = EntityKind::Employee;

    fn id(&self) -> Option<Id> {
        self.id
    }

    fn from_model(model: employee::Model) -> Self {
        Self {
            id: Some(model.id),
            telegram_id: model.telegram_id,
            company_id: model.company_id,
            is_active: model.is_active,
            is_admin: model.is_admin,
            created_at: model.created_at,
            salary_per_hour: model.salary_per_hour,
            display_name: model.display_name,
        }
    }

    fn into_active_model(self) -> employee::ActiveModel {
        employee::ActiveModel {
            id: self.id.map_or(NotSet, Set),
            telegram_id: Set(self.telegram_id),
            company_id: Set(self.company_id),
            is_active: Set(self.is_active),
            is_admin: Set(self.is_admin),
            created_at: Set(self.created_at),
            salary_per_hour: Set(self.salary_per_hour),
            display_name: Set(self.display_name),
        }
    }
}

pub type EmployeeRepo = Repo<Employee>;

impl EmployeeRepo {
    /// One membership per person per company, so the pair is a key.
    pub async fn get_by_telegram_id_and_company_id<C: ConnectionTrait>(
        db: &C,
        telegram_id: i64,
        company_id: Id,
    ) -> Result<Option<Employee>, AppError> {
        let model = employee::Entity::find()
            .filter(employee::Column::TelegramId.eq(telegram_id))
            .filter(employee::Column::CompanyId.eq(company_id))
            .one(db)
            .await?;
        Ok(model.map(Employee::from_model))
    }

    pub async fn get_by_company_id<C: ConnectionTrait>(
        db: &C,
        company_id: Id,
        pagination: &Pagination,
    ) -> Result<Page<Employee>, AppError> {
        Self::get_page(db, &vec![("company_id", company_id.into())], pagination).await
    }
}
