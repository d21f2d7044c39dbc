use db::{
    DatabaseConnection,
    crud::Id,
    error::{AppError, EntityKind},
    models::company::{Company, CompanyRepo},
    types::{Page, Pagination},
};

use super::normalize_code;

/// Authorization root: company ownership is the highest tier of access.
#[derive(Clone, Default)]
pub struct CompanyService;

impl CompanyService {
    pub fn new() -> Self {
        Self
    }

    /// Creates a company owned by the calling identity. The code is
    /// uppercased and must be exactly three letters; a colliding code
    /// fails with `AlreadyExists`.
    pub async fn create_company(
        &self,
        db: &DatabaseConnection,
        name: &str,
        code: &str,
        owner_tg_id: i64,
    ) -> Result<Company, AppError> {
        let code = normalize_code(EntityKind::Company, code)?;
        let company_id = CompanyRepo::create(db, Company::new(name, code, owner_tg_id)).await?;
        CompanyRepo::get_by_id(db, company_id).await
    }

    pub async fn delete_company(
        &self,
        db: &DatabaseConnection,
        company_id: Id,
        user_tg_id: i64,
    ) -> Result<(), AppError> {
        let company = CompanyRepo::get_by_id(db, company_id).await?;
        if company.owner_tg_id != user_tg_id {
            tracing::debug!(company_id, user_tg_id, "company deletion denied");
            return Err(AppError::AccessDenied(
                EntityKind::Company,
                "only the company owner can delete the company",
            ));
        }
        CompanyRepo::delete(db, company_id).await
    }

    pub async fn get_my_companies(
        &self,
        db: &DatabaseConnection,
        user_tg_id: i64,
        pagination: &Pagination,
    ) -> Result<Page<Company>, AppError> {
        CompanyRepo::get_by_owner_tg_id(db, user_tg_id, pagination).await
    }

    pub async fn get_company_details(
        &self,
        db: &DatabaseConnection,
        company_id: Id,
    ) -> Result<Company, AppError> {
        CompanyRepo::get_by_id(db, company_id).await
    }

    /// Never errors for a missing company; absence simply means the caller
    /// is not its owner.
    pub async fn verify_user_is_owner(
        &self,
        db: &DatabaseConnection,
        company_id: Id,
        user_tg_id: i64,
    ) -> Result<bool, AppError> {
        match CompanyRepo::get_by_id(db, company_id).await {
            Ok(company) => Ok(company.owner_tg_id == user_tg_id),
            Err(AppError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }
}
