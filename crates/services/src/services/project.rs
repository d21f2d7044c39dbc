use chrono::Utc;
use db::{
    DatabaseConnection,
    crud::Id,
    error::{AppError, EntityKind},
    models::project::{Project, ProjectRepo},
    types::{Page, Pagination},
};

use super::{company::CompanyService, normalize_code};

/// Project lifecycle is owner-only — stricter than employee management,
/// where active admins share the rights.
#[derive(Clone, Default)]
pub struct ProjectService {
    companies: CompanyService,
}

impl ProjectService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_project(
        &self,
        db: &DatabaseConnection,
        company_id: Id,
        name: &str,
        code: &str,
        user_tg_id: i64,
    ) -> Result<Project, AppError> {
        self.require_owner(db, company_id, user_tg_id).await?;
        let code = normalize_code(EntityKind::Project, code)?;
        let project_id =
            ProjectRepo::create(db, Project::new(company_id, name, code, Utc::now())).await?;
        ProjectRepo::get_by_id(db, project_id).await
    }

    pub async fn delete_project(
        &self,
        db: &DatabaseConnection,
        project_id: Id,
        user_tg_id: i64,
    ) -> Result<(), AppError> {
        let project = ProjectRepo::get_by_id(db, project_id).await?;
        self.require_owner(db, project.company_id, user_tg_id).await?;
        ProjectRepo::delete(db, project_id).await
    }

    pub async fn get_projects(
        &self,
        db: &DatabaseConnection,
        company_id: Id,
        pagination: &Pagination,
    ) -> Result<Page<Project>, AppError> {
        ProjectRepo::get_by_company_id(db, company_id, pagination).await
    }

    pub async fn get_project_details(
        &self,
        db: &DatabaseConnection,
        project_id: Id,
    ) -> Result<Project, AppError> {
        ProjectRepo::get_by_id(db, project_id).await
    }

    async fn require_owner(
        &self,
        db: &DatabaseConnection,
        company_id: Id,
        user_tg_id: i64,
    ) -> Result<(), AppError> {
        if self
            .companies
            .verify_user_is_owner(db, company_id, user_tg_id)
            .await?
        {
            return Ok(());
        }
        tracing::debug!(company_id, user_tg_id, "project management denied");
        Err(AppError::AccessDenied(
            EntityKind::Project,
            "only the company owner can manage projects",
        ))
    }
}

#[cfg(test)]
mod tests {
    use db::sea_orm::Database;
    use db_migration::MigratorTrait;

    use super::*;
    use crate::services::employee::EmployeeService;

    const OWNER: i64 = 1;

    async fn setup() -> (DatabaseConnection, ProjectService, Id) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();

        let company = CompanyService::new()
            .create_company(&db, "Acme", "ACM", OWNER)
            .await
            .unwrap();
        (db, ProjectService::new(), company.id.unwrap())
    }

    #[tokio::test]
    async fn creation_is_owner_only_even_for_admins() {
        let (db, service, company_id) = setup().await;

        EmployeeService::new()
            .create_employee(&db, company_id, 2, "Admin", 10.0, true, OWNER)
            .await
            .unwrap();

        let result = service.create_project(&db, company_id, "Web", "web", 2).await;
        assert!(matches!(
            result,
            Err(AppError::AccessDenied(EntityKind::Project, _))
        ));

        let project = service
            .create_project(&db, company_id, "Web", "web", OWNER)
            .await
            .unwrap();
        assert_eq!(project.code, "WEB");
        assert_eq!(project.company_id, company_id);
    }

    #[tokio::test]
    async fn invalid_codes_are_rejected() {
        let (db, service, company_id) = setup().await;

        for bad in ["we", "webb", "w3b"] {
            let result = service
                .create_project(&db, company_id, "Web", bad, OWNER)
                .await;
            assert!(matches!(
                result,
                Err(AppError::InvalidCode(EntityKind::Project, _))
            ));
        }
    }

    #[tokio::test]
    async fn codes_collide_across_companies() {
        let (db, service, company_id) = setup().await;

        let other = CompanyService::new()
            .create_company(&db, "Beta", "BET", 9)
            .await
            .unwrap();

        service
            .create_project(&db, company_id, "Web", "WEB", OWNER)
            .await
            .unwrap();
        let result = service
            .create_project(&db, other.id.unwrap(), "Web too", "WEB", 9)
            .await;

        assert!(matches!(
            result,
            Err(AppError::AlreadyExists(EntityKind::Project, _))
        ));
    }

    #[tokio::test]
    async fn deletion_is_owner_only() {
        let (db, service, company_id) = setup().await;

        let project = service
            .create_project(&db, company_id, "Web", "WEB", OWNER)
            .await
            .unwrap();
        let project_id = project.id.unwrap();

        let result = service.delete_project(&db, project_id, 2).await;
        assert!(matches!(
            result,
            Err(AppError::AccessDenied(EntityKind::Project, _))
        ));

        service.delete_project(&db, project_id, OWNER).await.unwrap();
        let result = service.get_project_details(&db, project_id).await;
        assert!(matches!(
            result,
            Err(AppError::NotFound(EntityKind::Project))
        ));
    }

    #[tokio::test]
    async fn listing_is_scoped_to_the_company() {
        let (db, service, company_id) = setup().await;

        for code in ["AAA", "BBB", "CCC"] {
            service
                .create_project(&db, company_id, "P", code, OWNER)
                .await
                .unwrap();
        }

        let page = service
            .get_projects(&db, company_id, &Pagination::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.data.len(), 2);
    }
}
