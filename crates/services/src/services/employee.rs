use chrono::Utc;
use db::{
    DatabaseConnection,
    crud::Id,
    error::{AppError, EntityKind},
    models::employee::{Employee, EmployeeRepo},
    types::{Page, Pagination},
};

use super::company::CompanyService;

/// Role resolution. "Owner or active admin" is the single authorization
/// primitive shared by every mutation path in the system.
#[derive(Clone, Default)]
pub struct EmployeeService {
    companies: CompanyService,
}

impl EmployeeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn verify_user_is_owner_or_admin(
        &self,
        db: &DatabaseConnection,
        company_id: Id,
        user_tg_id: i64,
    ) -> Result<bool, AppError> {
        if self
            .companies
            .verify_user_is_owner(db, company_id, user_tg_id)
            .await?
        {
            return Ok(true);
        }
        let employee =
            EmployeeRepo::get_by_telegram_id_and_company_id(db, user_tg_id, company_id).await?;
        Ok(employee.is_some_and(|employee| employee.is_admin && employee.is_active))
    }

    /// New employees always start active. A second membership for the same
    /// telegram identity in the same company fails with `AlreadyExists`.
    pub async fn create_employee(
        &self,
        db: &DatabaseConnection,
        company_id: Id,
        telegram_id: i64,
        display_name: &str,
        salary_per_hour: f64,
        is_admin: bool,
        user_tg_id: i64,
    ) -> Result<Employee, AppError> {
        self.require_owner_or_admin(db, company_id, user_tg_id).await?;
        let employee = Employee::new(
            company_id,
            telegram_id,
            display_name,
            salary_per_hour,
            is_admin,
            Utc::now(),
        );
        let employee_id = EmployeeRepo::create(db, employee).await?;
        EmployeeRepo::get_by_id(db, employee_id).await
    }

    pub async fn delete_employee(
        &self,
        db: &DatabaseConnection,
        employee_id: Id,
        user_tg_id: i64,
    ) -> Result<(), AppError> {
        let employee = EmployeeRepo::get_by_id(db, employee_id).await?;
        self.require_owner_or_admin(db, employee.company_id, user_tg_id)
            .await?;
        EmployeeRepo::delete(db, employee_id).await
    }

    pub async fn set_display_name(
        &self,
        db: &DatabaseConnection,
        employee_id: Id,
        display_name: &str,
        user_tg_id: i64,
    ) -> Result<Employee, AppError> {
        let mut employee = EmployeeRepo::get_by_id(db, employee_id).await?;
        self.require_owner_or_admin(db, employee.company_id, user_tg_id)
            .await?;
        employee.display_name = display_name.to_string();
        EmployeeRepo::update_and_get(db, employee).await
    }

    pub async fn set_salary_per_hour(
        &self,
        db: &DatabaseConnection,
        employee_id: Id,
        salary_per_hour: f64,
        user_tg_id: i64,
    ) -> Result<Employee, AppError> {
        let mut employee = EmployeeRepo::get_by_id(db, employee_id).await?;
        self.require_owner_or_admin(db, employee.company_id, user_tg_id)
            .await?;
        employee.salary_per_hour = salary_per_hour;
        EmployeeRepo::update_and_get(db, employee).await
    }

    pub async fn set_is_active(
        &self,
        db: &DatabaseConnection,
        employee_id: Id,
        is_active: bool,
        user_tg_id: i64,
    ) -> Result<Employee, AppError> {
        let mut employee = EmployeeRepo::get_by_id(db, employee_id).await?;
        self.require_owner_or_admin(db, employee.company_id, user_tg_id)
            .await?;
        employee.is_active = is_active;
        EmployeeRepo::update_and_get(db, employee).await
    }

    pub async fn get_employees(
        &self,
        db: &DatabaseConnection,
        company_id: Id,
        pagination: &Pagination,
    ) -> Result<Page<Employee>, AppError> {
        EmployeeRepo::get_by_company_id(db, company_id, pagination).await
    }

    pub async fn get_employee_details(
        &self,
        db: &DatabaseConnection,
        employee_id: Id,
    ) -> Result<Employee, AppError> {
        EmployeeRepo::get_by_id(db, employee_id).await
    }

    pub async fn get_employee_by_telegram_id_and_company_id(
        &self,
        db: &DatabaseConnection,
        telegram_id: i64,
        company_id: Id,
    ) -> Result<Option<Employee>, AppError> {
        EmployeeRepo::get_by_telegram_id_and_company_id(db, telegram_id, company_id).await
    }

    async fn require_owner_or_admin(
        &self,
        db: &DatabaseConnection,
        company_id: Id,
        user_tg_id: i64,
    ) -> Result<(), AppError> {
        if self
            .verify_user_is_owner_or_admin(db, company_id, user_tg_id)
            .await?
        {
            return Ok(());
        }
        tracing::debug!(company_id, user_tg_id, "employee management denied");
        Err(AppError::AccessDenied(
            EntityKind::Employee,
            "only the company owner or an active admin can manage employees",
        ))
    }
}
