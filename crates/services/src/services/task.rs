use chrono::{DateTime, Utc};
use db::{
    DatabaseConnection,
    crud::Id,
    error::{AppError, EntityKind},
    models::{
        company::CompanyRepo,
        project::ProjectRepo,
        task::{Task, TaskRepo, TaskStatus},
    },
    types::{Page, Pagination},
};

use super::{employee::EmployeeService, project::ProjectService};

pub const DEFAULT_SOON_DEADLINE_DAYS: i64 = 7;

/// Task orchestration. Every mutation is gated on the owner-or-admin
/// check of the project's company; reads are ungated.
#[derive(Clone, Default)]
pub struct TaskService {
    projects: ProjectService,
    employees: EmployeeService,
}

impl TaskService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn verify_user_has_access_to_project(
        &self,
        db: &DatabaseConnection,
        project_id: Id,
        user_tg_id: i64,
    ) -> Result<bool, AppError> {
        let project = self.projects.get_project_details(db, project_id).await?;
        self.employees
            .verify_user_is_owner_or_admin(db, project.company_id, user_tg_id)
            .await
    }

    /// Creates a task with the next free code in the project's sequence.
    pub async fn create_task(
        &self,
        db: &DatabaseConnection,
        project_id: Id,
        name: &str,
        description: &str,
        deadline: DateTime<Utc>,
        assignee_user_id: i64,
        user_tg_id: i64,
    ) -> Result<Task, AppError> {
        self.require_project_access(db, project_id, user_tg_id).await?;
        let code = TaskRepo::next_code_for_project(db, project_id).await?;
        let task = Task::new(
            project_id,
            name,
            code,
            description,
            deadline,
            assignee_user_id,
            Utc::now(),
        );
        let task_id = TaskRepo::create(db, task).await?;
        TaskRepo::get_by_id(db, task_id).await
    }

    pub async fn edit_name(
        &self,
        db: &DatabaseConnection,
        task_id: Id,
        name: &str,
        user_tg_id: i64,
    ) -> Result<Task, AppError> {
        let mut task = TaskRepo::get_by_id(db, task_id).await?;
        self.require_project_access(db, task.project_id, user_tg_id)
            .await?;
        task.name = name.to_string();
        TaskRepo::update_and_get(db, task).await
    }

    pub async fn edit_description(
        &self,
        db: &DatabaseConnection,
        task_id: Id,
        description: &str,
        user_tg_id: i64,
    ) -> Result<Task, AppError> {
        let mut task = TaskRepo::get_by_id(db, task_id).await?;
        self.require_project_access(db, task.project_id, user_tg_id)
            .await?;
        task.description = description.to_string();
        TaskRepo::update_and_get(db, task).await
    }

    pub async fn set_deadline(
        &self,
        db: &DatabaseConnection,
        task_id: Id,
        deadline: DateTime<Utc>,
        user_tg_id: i64,
    ) -> Result<Task, AppError> {
        let mut task = TaskRepo::get_by_id(db, task_id).await?;
        self.require_project_access(db, task.project_id, user_tg_id)
            .await?;
        task.deadline = deadline;
        TaskRepo::update_and_get(db, task).await
    }

    pub async fn assign_to_user(
        &self,
        db: &DatabaseConnection,
        task_id: Id,
        assignee_user_id: i64,
        user_tg_id: i64,
    ) -> Result<Task, AppError> {
        let mut task = TaskRepo::get_by_id(db, task_id).await?;
        self.require_project_access(db, task.project_id, user_tg_id)
            .await?;
        task.assignee_user_id = assignee_user_id;
        TaskRepo::update_and_get(db, task).await
    }

    /// Any status may be set by an authorized caller; transition legality
    /// is not enforced here.
    pub async fn update_status(
        &self,
        db: &DatabaseConnection,
        task_id: Id,
        status: TaskStatus,
        user_tg_id: i64,
    ) -> Result<Task, AppError> {
        let mut task = TaskRepo::get_by_id(db, task_id).await?;
        self.require_project_access(db, task.project_id, user_tg_id)
            .await?;
        task.status = status;
        TaskRepo::update_and_get(db, task).await
    }

    pub async fn delete_task(
        &self,
        db: &DatabaseConnection,
        task_id: Id,
        user_tg_id: i64,
    ) -> Result<(), AppError> {
        let task = TaskRepo::get_by_id(db, task_id).await?;
        self.require_project_access(db, task.project_id, user_tg_id)
            .await?;
        TaskRepo::delete(db, task_id).await
    }

    pub async fn get_my_tasks(
        &self,
        db: &DatabaseConnection,
        assignee_user_id: i64,
        pagination: &Pagination,
    ) -> Result<Page<Task>, AppError> {
        TaskRepo::get_by_assignee_user_id(db, assignee_user_id, pagination).await
    }

    pub async fn get_tasks(
        &self,
        db: &DatabaseConnection,
        project_id: Id,
        pagination: &Pagination,
    ) -> Result<Page<Task>, AppError> {
        TaskRepo::get_by_project_id(db, project_id, pagination).await
    }

    pub async fn get_task_details(
        &self,
        db: &DatabaseConnection,
        task_id: Id,
    ) -> Result<Task, AppError> {
        TaskRepo::get_by_id(db, task_id).await
    }

    /// Tasks whose deadline falls within the next `days` days, soonest
    /// first.
    pub async fn get_soon_deadlines(
        &self,
        db: &DatabaseConnection,
        days: i64,
    ) -> Result<Vec<Task>, AppError> {
        TaskRepo::get_with_deadline_within(db, Utc::now(), days).await
    }

    /// Resolves `COMPANY/PROJECT/code` one link at a time; the error names
    /// the first link that does not resolve.
    pub async fn get_task_by_full_code(
        &self,
        db: &DatabaseConnection,
        company_code: &str,
        project_code: &str,
        task_code: i32,
    ) -> Result<Task, AppError> {
        let company = CompanyRepo::get_by_code(db, &company_code.to_uppercase())
            .await?
            .ok_or(AppError::NotFound(EntityKind::Company))?;
        let project = ProjectRepo::get_by_code(db, &project_code.to_uppercase())
            .await?
            .ok_or(AppError::NotFound(EntityKind::Project))?;

        let (Some(company_id), Some(project_id)) = (company.id, project.id) else {
            return Err(AppError::NotFound(EntityKind::Project));
        };
        if project.company_id != company_id {
            // Project codes are globally unique, so a hit under the wrong
            // company is still an unresolved link.
            return Err(AppError::NotFound(EntityKind::Project));
        }

        TaskRepo::get_by_code_and_project_id(db, task_code, project_id)
            .await?
            .ok_or(AppError::NotFound(EntityKind::Task))
    }

    async fn require_project_access(
        &self,
        db: &DatabaseConnection,
        project_id: Id,
        user_tg_id: i64,
    ) -> Result<(), AppError> {
        if self
            .verify_user_has_access_to_project(db, project_id, user_tg_id)
            .await?
        {
            return Ok(());
        }
        tracing::debug!(project_id, user_tg_id, "task management denied");
        Err(AppError::AccessDenied(
            EntityKind::Task,
            "only the company owner or an active admin can manage tasks",
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use db::sea_orm::Database;
    use db_migration::MigratorTrait;

    use super::*;
    use crate::services::company::CompanyService;

    const OWNER: i64 = 1;

    async fn setup() -> (DatabaseConnection, TaskService, Id) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();

        let company = CompanyService::new()
            .create_company(&db, "Acme", "ACM", OWNER)
            .await
            .unwrap();
        let project = ProjectService::new()
            .create_project(&db, company.id.unwrap(), "Web", "WEB", OWNER)
            .await
            .unwrap();
        (db, TaskService::new(), project.id.unwrap())
    }

    fn tomorrow() -> DateTime<Utc> {
        Utc::now() + Duration::days(1)
    }

    #[tokio::test]
    async fn codes_are_assigned_sequentially() {
        let (db, service, project_id) = setup().await;

        let first = service
            .create_task(&db, project_id, "First", "", tomorrow(), 2, OWNER)
            .await
            .unwrap();
        let second = service
            .create_task(&db, project_id, "Second", "", tomorrow(), 2, OWNER)
            .await
            .unwrap();

        assert_eq!(first.code, 1);
        assert_eq!(second.code, 2);
        assert_eq!(first.status, TaskStatus::New);
    }

    #[tokio::test]
    async fn sequence_continues_past_a_gap() {
        let (db, service, project_id) = setup().await;

        // A row inserted around the service, leaving a gap below it.
        TaskRepo::create(
            &db,
            Task::new(project_id, "Imported", 5, "", tomorrow(), 2, Utc::now()),
        )
        .await
        .unwrap();

        let task = service
            .create_task(&db, project_id, "Next", "", tomorrow(), 2, OWNER)
            .await
            .unwrap();
        assert_eq!(task.code, 6);
    }

    #[tokio::test]
    async fn mutation_requires_project_access() {
        let (db, service, project_id) = setup().await;

        let result = service
            .create_task(&db, project_id, "Nope", "", tomorrow(), 2, 42)
            .await;
        assert!(matches!(
            result,
            Err(AppError::AccessDenied(EntityKind::Task, _))
        ));

        let task = service
            .create_task(&db, project_id, "Task", "", tomorrow(), 2, OWNER)
            .await
            .unwrap();
        let task_id = task.id.unwrap();

        let result = service.update_status(&db, task_id, TaskStatus::Done, 42).await;
        assert!(matches!(
            result,
            Err(AppError::AccessDenied(EntityKind::Task, _))
        ));
    }

    #[tokio::test]
    async fn targeted_updates_change_one_field() {
        let (db, service, project_id) = setup().await;

        let task = service
            .create_task(&db, project_id, "Task", "desc", tomorrow(), 2, OWNER)
            .await
            .unwrap();
        let task_id = task.id.unwrap();

        let renamed = service.edit_name(&db, task_id, "Renamed", OWNER).await.unwrap();
        assert_eq!(renamed.name, "Renamed");
        assert_eq!(renamed.description, "desc");

        let described = service
            .edit_description(&db, task_id, "new words", OWNER)
            .await
            .unwrap();
        assert_eq!(described.description, "new words");

        let reassigned = service.assign_to_user(&db, task_id, 9, OWNER).await.unwrap();
        assert_eq!(reassigned.assignee_user_id, 9);

        let new_deadline = tomorrow() + Duration::days(3);
        let rescheduled = service
            .set_deadline(&db, task_id, new_deadline, OWNER)
            .await
            .unwrap();
        assert_eq!(rescheduled.deadline, new_deadline);

        // Status moves freely, including straight to a terminal state.
        let done = service
            .update_status(&db, task_id, TaskStatus::Done, OWNER)
            .await
            .unwrap();
        assert_eq!(done.status, TaskStatus::Done);
        let reopened = service
            .update_status(&db, task_id, TaskStatus::InProgress, OWNER)
            .await
            .unwrap();
        assert_eq!(reopened.status, TaskStatus::InProgress);

        service.delete_task(&db, task_id, OWNER).await.unwrap();
        assert!(matches!(
            service.get_task_details(&db, task_id).await,
            Err(AppError::NotFound(EntityKind::Task))
        ));
    }

    #[tokio::test]
    async fn soon_deadlines_form_a_window() {
        let (db, service, project_id) = setup().await;
        let now = Utc::now();

        for (name, offset) in [("soon", 1), ("later", 6), ("far", 8)] {
            service
                .create_task(
                    &db,
                    project_id,
                    name,
                    "",
                    now + Duration::days(offset),
                    2,
                    OWNER,
                )
                .await
                .unwrap();
        }

        let upcoming = service
            .get_soon_deadlines(&db, DEFAULT_SOON_DEADLINE_DAYS)
            .await
            .unwrap();
        let names: Vec<&str> = upcoming.iter().map(|task| task.name.as_str()).collect();
        assert_eq!(names, ["soon", "later"]);
    }

    #[tokio::test]
    async fn full_code_resolution_names_the_broken_link() {
        let (db, service, project_id) = setup().await;

        let task = service
            .create_task(&db, project_id, "Task", "", tomorrow(), 2, OWNER)
            .await
            .unwrap();

        let found = service
            .get_task_by_full_code(&db, "acm", "web", task.code)
            .await
            .unwrap();
        assert_eq!(found.id, task.id);

        assert!(matches!(
            service.get_task_by_full_code(&db, "XXX", "WEB", 1).await,
            Err(AppError::NotFound(EntityKind::Company))
        ));
        assert!(matches!(
            service.get_task_by_full_code(&db, "ACM", "XXX", 1).await,
            Err(AppError::NotFound(EntityKind::Project))
        ));
        assert!(matches!(
            service.get_task_by_full_code(&db, "ACM", "WEB", 99).await,
            Err(AppError::NotFound(EntityKind::Task))
        ));

        // A real project code under a different company is an unresolved
        // link, not a hit.
        let other = CompanyService::new()
            .create_company(&db, "Beta", "BET", 9)
            .await
            .unwrap();
        ProjectService::new()
            .create_project(&db, other.id.unwrap(), "Api", "API", 9)
            .await
            .unwrap();
        assert!(matches!(
            service.get_task_by_full_code(&db, "ACM", "API", 1).await,
            Err(AppError::NotFound(EntityKind::Project))
        ));
    }

    #[tokio::test]
    async fn admins_of_the_company_may_manage_tasks() {
        let (db, service, project_id) = setup().await;

        let project = ProjectService::new()
            .get_project_details(&db, project_id)
            .await
            .unwrap();
        EmployeeService::new()
            .create_employee(&db, project.company_id, 2, "Admin", 10.0, true, OWNER)
            .await
            .unwrap();

        let task = service
            .create_task(&db, project_id, "By admin", "", tomorrow(), 2, 2)
            .await
            .unwrap();
        assert_eq!(task.code, 1);
    }

    #[tokio::test]
    async fn my_tasks_lists_by_assignee() {
        let (db, service, project_id) = setup().await;

        service
            .create_task(&db, project_id, "mine", "", tomorrow(), 7, OWNER)
            .await
            .unwrap();
        service
            .create_task(&db, project_id, "other", "", tomorrow(), 8, OWNER)
            .await
            .unwrap();

        let page = service
            .get_my_tasks(&db, 7, &Pagination::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].name, "mine");

        let page = service
            .get_tasks(&db, project_id, &Pagination::default())
            .await
            .unwrap();
        assert_eq!(page.total, 2);
    }
}
