use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, NotSet, Set};
use sea_orm::sea_query::{Alias, Expr, ExprTrait, Func, JoinType, Order, Query};
use serde::{Deserialize, Serialize};

use crate::{
    crud::Id,
    entities::{company, employee, project, task, time_entry},
    error::{AppError, EntityKind},
    repo::{Record, Repo},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimeTrackingEntry {
    pub id: Option<Id>,
    pub task_id: Id,
    pub employee_id: Id,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
}

impl TimeTrackingEntry {
    pub fn new(task_id: Id, employee_id: Id, duration_minutes: i32, created_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            task_id,
            employee_id,
            duration_minutes,
            created_at,
        }
    }
}

impl Record for TimeTrackingEntry {
    type Entity = time_entry::Entity;
    type ActiveModel = time_entry::ActiveModel;

    const KIND: EntityKind = EntityKind::TimeEntry;

    fn id(&self) -> Option<Id> {
        self.id
    }

    fn from_model(model: time_entry::Model) -> Self {
        Self {
            id: Some(model.id),
            task_id: model.task_id,
            employee_id: model.employee_id,
            duration_minutes: model.duration_minutes,
            created_at: model.created_at,
        }
    }

    fn into_active_model(self) -> time_entry::ActiveModel {
        time_entry::ActiveModel {
            id: self.id.map_or(NotSet, Set),
            task_id: Set(self.task_id),
            employee_id: Set(self.employee_id),
            duration_minutes: Set(self.duration_minutes),
            created_at: Set(self.created_at),
        }
    }
}

/// One time entry joined across task, project, employee and company; the
/// raw material for the per-project and per-employee reports.
#[derive(Clone, Debug, Serialize)]
pub struct CompanyTimeRow {
    pub company_code: String,
    pub project_code: String,
    pub task_code: i32,
    pub task_name: String,
    pub employee_display_name: String,
    pub created_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub salary_per_hour: f64,
}

pub type TimeEntryRepo = Repo<TimeTrackingEntry>;

impl TimeEntryRepo {
    pub async fn total_minutes_by_task_and_employee<C: ConnectionTrait>(
        db: &C,
        task_id: Id,
        employee_id: Id,
    ) -> Result<i64, AppError> {
        let query = Query::select()
            .expr_as(
                Func::sum(Expr::col(time_entry::Column::DurationMinutes)),
                Alias::new("total_minutes"),
            )
            .from(time_entry::Entity)
            .and_where(Expr::col(time_entry::Column::TaskId).eq(task_id))
            .and_where(Expr::col(time_entry::Column::EmployeeId).eq(employee_id))
            .to_owned();

        let total: Option<i64> = match db.query_one(&query).await? {
            Some(row) => row.try_get("", "total_minutes")?,
            None => None,
        };
        Ok(total.unwrap_or(0))
    }

    /// Every time entry recorded under the company, resolved through the
    /// task → project → company chain, oldest first within a project.
    pub async fn report_rows_for_company<C: ConnectionTrait>(
        db: &C,
        company_id: Id,
    ) -> Result<Vec<CompanyTimeRow>, AppError> {
        let query = Query::select()
            .expr_as(
                Expr::col((company::Entity, company::Column::Code)),
                Alias::new("company_code"),
            )
            .expr_as(
                Expr::col((project::Entity, project::Column::Code)),
                Alias::new("project_code"),
            )
            .expr_as(
                Expr::col((task::Entity, task::Column::Code)),
                Alias::new("task_code"),
            )
            .expr_as(
                Expr::col((task::Entity, task::Column::Name)),
                Alias::new("task_name"),
            )
            .expr_as(
                Expr::col((employee::Entity, employee::Column::DisplayName)),
                Alias::new("employee_display_name"),
            )
            .expr_as(
                Expr::col((time_entry::Entity, time_entry::Column::CreatedAt)),
                Alias::new("created_at"),
            )
            .expr_as(
                Expr::col((time_entry::Entity, time_entry::Column::DurationMinutes)),
                Alias::new("duration_minutes"),
            )
            .expr_as(
                Expr::col((employee::Entity, employee::Column::SalaryPerHour)),
                Alias::new("salary_per_hour"),
            )
            .from(time_entry::Entity)
            .join(
                JoinType::InnerJoin,
                task::Entity,
                Expr::col((task::Entity, task::Column::Id))
                    .equals((time_entry::Entity, time_entry::Column::TaskId)),
            )
            .join(
                JoinType::InnerJoin,
                project::Entity,
                Expr::col((project::Entity, project::Column::Id))
                    .equals((task::Entity, task::Column::ProjectId)),
            )
            .join(
                JoinType::InnerJoin,
                employee::Entity,
                Expr::col((employee::Entity, employee::Column::Id))
                    .equals((time_entry::Entity, time_entry::Column::EmployeeId)),
            )
            .join(
                JoinType::InnerJoin,
                company::Entity,
                Expr::col((company::Entity, company::Column::Id))
                    .equals((project::Entity, project::Column::CompanyId)),
            )
            .and_where(Expr::col((project::Entity, project::Column::CompanyId)).eq(company_id))
            .order_by((project::Entity, project::Column::Code), Order::Asc)
            .order_by(
                (time_entry::Entity, time_entry::Column::CreatedAt),
                Order::Asc,
            )
            .to_owned();

        let rows = db.query_all(&query).await?;
        let mut report = Vec::with_capacity(rows.len());
        for row in rows {
            report.push(CompanyTimeRow {
                company_code: row.try_get("", "company_code")?,
                project_code: row.try_get("", "project_code")?,
                task_code: row.try_get("", "task_code")?,
                task_name: row.try_get("", "task_name")?,
                employee_display_name: row.try_get("", "employee_display_name")?,
                created_at: row.try_get("", "created_at")?,
                duration_minutes: row.try_get("", "duration_minutes")?,
                salary_per_hour: row.try_get("", "salary_per_hour")?,
            });
        }
        Ok(report)
    }
}
