pub mod services;

pub use services::{
    company::CompanyService,
    employee::EmployeeService,
    project::ProjectService,
    task::TaskService,
    time_tracking::TimeTrackingService,
};

/// Bundles the service layer for callers that want a single entry point.
/// Services are stateless; composition only fixes the call graph
/// (tasks → projects/employees → companies).
#[derive(Clone, Default)]
pub struct Services {
    pub companies: CompanyService,
    pub employees: EmployeeService,
    pub projects: ProjectService,
    pub tasks: TaskService,
    pub time_tracking: TimeTrackingService,
}

impl Services {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use db::error::{AppError, EntityKind};
    use db::sea_orm::Database;
    use db_migration::MigratorTrait;

    use super::*;

    /// The full lifecycle: company, admin hire, owner-only project
    /// creation, sequential task codes, and a logged time entry.
    #[tokio::test]
    async fn company_to_time_entry_scenario() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        let services = Services::new();

        let company = services
            .companies
            .create_company(&db, "Acme", "ACM", 1)
            .await
            .unwrap();
        let company_id = company.id.unwrap();

        let employee = services
            .employees
            .create_employee(&db, company_id, 2, "Admin", 10.0, true, 1)
            .await
            .unwrap();

        // An admin is not enough to create projects.
        let denied = services
            .projects
            .create_project(&db, company_id, "Web", "web", 2)
            .await;
        assert!(matches!(
            denied,
            Err(AppError::AccessDenied(EntityKind::Project, _))
        ));

        let project = services
            .projects
            .create_project(&db, company_id, "Web", "web", 1)
            .await
            .unwrap();
        assert_eq!(project.code, "WEB");
        let project_id = project.id.unwrap();

        let deadline = Utc::now() + Duration::days(3);
        let first = services
            .tasks
            .create_task(&db, project_id, "First", "", deadline, 2, 1)
            .await
            .unwrap();
        let second = services
            .tasks
            .create_task(&db, project_id, "Second", "", deadline, 2, 1)
            .await
            .unwrap();
        assert_eq!(first.code, 1);
        assert_eq!(second.code, 2);

        services
            .time_tracking
            .create_time_entry(&db, first.id.unwrap(), employee.id.unwrap(), 90)
            .await
            .unwrap();

        let total = services
            .time_tracking
            .get_total_minutes_by_task_and_employee(
                &db,
                first.id.unwrap(),
                employee.id.unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(total, 90);
    }
}
