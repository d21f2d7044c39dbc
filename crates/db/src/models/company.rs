use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::{
    crud::Id,
    entities::company,
    error::{AppError, EntityKind},
    repo::{Record, Repo},
    types::{Page, Pagination},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Company {
    pub id: Option<Id>,
    pub name: String,
    pub code: String,
    pub owner_tg_id: i64,
}

impl Company {
    pub fn new(name: impl Into<String>, code: impl Into<String>, owner_tg_id: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            code: code.into(),
            owner_tg_id,
        }
    }
}

impl Record for Company {
    type Entity = company::Entity;
    type ActiveModel = company::ActiveModel;

    const KIND: EntityKind = EntityKind::Company;

    fn id(&self) -> Option<Id> {
        self.id
    }

    fn from_model(model: company::Model) -> Self {
        Self {
            id: Some(model.id),
            name: model.name,
            code: model.code,
            owner_tg_id: model.owner_tg_id,
        }
    }

    fn into_active_model(self) -> company::ActiveModel {
        company::ActiveModel {
            id: self.id.map_or(NotSet, Set),
            name: Set(self.name),
            code: Set(self.code),
            owner_tg_id: Set(self.owner_tg_id),
        }
    }
}

pub type CompanyRepo = Repo<Company>;

impl CompanyRepo {
    pub async fn get_by_code<C: ConnectionTrait>(
        db: &C,
        code: &str,
    ) -> Result<Option<Company>, AppError> {
        let model = company::Entity::find()
            .filter(company::Column::Code.eq(code))
            .one(db)
            .await?;
        Ok(model.map(Company::from_model))
    }

    pub async fn get_by_owner_tg_id<C: ConnectionTrait>(
        db: &C,
        owner_tg_id: i64,
        pagination: &Pagination,
    ) -> Result<Page<Company>, AppError> {
        Self::get_page(db, &vec![("owner_tg_id", owner_tg_id.into())], pagination).await
    }
}
