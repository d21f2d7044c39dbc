use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::{
    crud::Id,
    entities::project,
    error::{AppError, EntityKind},
    repo::{Record, Repo},
    types::{Page, Pagination},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<Id>,
    pub company_id: Id,
    pub name: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(
        company_id: Id,
        name: impl Into<String>,
        code: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            company_id,
            name: name.into(),
            code: code.into(),
            created_at,
        }
    }
}

impl Record for Project {
    type Entity = project::Entity;
    type ActiveModel = project::ActiveModel;

    const KIND: EntityKind = EntityKind::Project;

    fn id(&self) -> Option<Id> {
        self.id
    }

    fn from_model(model: project::Model) -> Self {
        Self {
            id: Some(model.id),
            company_id: model.company_id,
            name: model.name,
            code: model.code,
            created_at: model.created_at,
        }
    }

    fn into_active_model(self) -> project::ActiveModel {
        project::ActiveModel {
            id: self.id.map_or(NotSet, Set),
            company_id: Set(self.company_id),
            name: Set(self.name),
            code: Set(self.code),
            created_at: Set(self.created_at),
        }
    }
}

pub type ProjectRepo = Repo<Project>;

impl ProjectRepo {
    pub async fn get_by_code<C: ConnectionTrait>(
        db: &C,
        code: &str,
    ) -> Result<Option<Project>, AppError> {
        let model = project::Entity::find()
            .filter(project::Column::Code.eq(code))
            .one(db)
            .await?;
        Ok(model.map(Project::from_model))
    }

    pub async fn get_by_company_id<C: ConnectionTrait>(
        db: &C,
        company_id: Id,
        pagination: &Pagination,
    ) -> Result<Page<Project>, AppError> {
        Self::get_page(db, &vec![("company_id", company_id.into())], pagination).await
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;
    use crate::models::company::{Company, CompanyRepo};

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn seed_company(db: &sea_orm::DatabaseConnection, code: &str, owner: i64) -> Id {
        CompanyRepo::create(db, Company::new(format!("Company {code}"), code, owner))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn code_is_unique_across_companies() {
        let db = setup_db().await;

        let first = seed_company(&db, "AAA", 1).await;
        let second = seed_company(&db, "BBB", 2).await;

        ProjectRepo::create(&db, Project::new(first, "Web", "WEB", Utc::now()))
            .await
            .unwrap();
        let result = ProjectRepo::create(&db, Project::new(second, "Web too", "WEB", Utc::now())).await;

        assert!(matches!(
            result,
            Err(AppError::AlreadyExists(EntityKind::Project, _))
        ));
    }

    #[tokio::test]
    async fn listing_by_company_is_scoped() {
        let db = setup_db().await;

        let first = seed_company(&db, "AAA", 1).await;
        let second = seed_company(&db, "BBB", 2).await;

        for code in ["ONE", "TWO"] {
            ProjectRepo::create(&db, Project::new(first, format!("P {code}"), code, Utc::now()))
                .await
                .unwrap();
        }
        ProjectRepo::create(&db, Project::new(second, "Other", "OTR", Utc::now()))
            .await
            .unwrap();

        let page = ProjectRepo::get_by_company_id(&db, first, &Pagination::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert!(page.data.iter().all(|project| project.company_id == first));
    }

    #[tokio::test]
    async fn deleting_a_company_cascades_to_projects() {
        let db = setup_db().await;

        let company_id = seed_company(&db, "AAA", 1).await;
        let project_id = ProjectRepo::create(&db, Project::new(company_id, "Web", "WEB", Utc::now()))
            .await
            .unwrap();

        CompanyRepo::delete(&db, company_id).await.unwrap();

        let result = ProjectRepo::get_by_id(&db, project_id).await;
        assert!(matches!(
            result,
            Err(AppError::NotFound(EntityKind::Project))
        ));
    }
}
