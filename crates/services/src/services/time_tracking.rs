use chrono::{DateTime, Utc};
use db::{
    DatabaseConnection,
    crud::Id,
    error::AppError,
    models::time_entry::{TimeEntryRepo, TimeTrackingEntry},
};
use serde::Serialize;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Accumulated spend for one project of a company.
#[derive(Clone, Debug, Serialize)]
pub struct ProjectStats {
    pub project_code: String,
    pub total_hours_spent: f64,
    pub total_money_spent: f64,
}

/// One report line per time entry, joined across the company's chain.
#[derive(Clone, Debug, Serialize)]
pub struct EmployeeStatsRow {
    pub company_code: String,
    pub project_code: String,
    pub task_code: i32,
    pub task_name: String,
    pub employee_display_name: String,
    pub created_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub salary: f64,
}

/// Append-only work ledger and the payroll-style reports over it.
#[derive(Clone, Default)]
pub struct TimeTrackingService;

impl TimeTrackingService {
    pub fn new() -> Self {
        Self
    }

    /// The caller is trusted: the presentation layer restricts logging to
    /// the task's assignee and validates that the duration is positive.
    pub async fn create_time_entry(
        &self,
        db: &DatabaseConnection,
        task_id: Id,
        employee_id: Id,
        duration_minutes: i32,
    ) -> Result<TimeTrackingEntry, AppError> {
        let entry = TimeTrackingEntry::new(task_id, employee_id, duration_minutes, Utc::now());
        let entry_id = TimeEntryRepo::create(db, entry).await?;
        TimeEntryRepo::get_by_id(db, entry_id).await
    }

    pub async fn get_total_minutes_by_task_and_employee(
        &self,
        db: &DatabaseConnection,
        task_id: Id,
        employee_id: Id,
    ) -> Result<i64, AppError> {
        TimeEntryRepo::total_minutes_by_task_and_employee(db, task_id, employee_id).await
    }

    /// Per-project totals across every time entry under the company.
    /// Hours and money are rounded to two decimals after accumulation.
    pub async fn get_project_stats_for_company(
        &self,
        db: &DatabaseConnection,
        company_id: Id,
    ) -> Result<Vec<ProjectStats>, AppError> {
        let rows = TimeEntryRepo::report_rows_for_company(db, company_id).await?;

        let mut stats: Vec<ProjectStats> = Vec::new();
        for row in rows {
            let hours = f64::from(row.duration_minutes) / MINUTES_PER_HOUR;
            let money = hours * row.salary_per_hour;
            match stats
                .iter_mut()
                .find(|entry| entry.project_code == row.project_code)
            {
                Some(entry) => {
                    entry.total_hours_spent += hours;
                    entry.total_money_spent += money;
                }
                None => stats.push(ProjectStats {
                    project_code: row.project_code,
                    total_hours_spent: hours,
                    total_money_spent: money,
                }),
            }
        }

        for entry in &mut stats {
            entry.total_hours_spent = round2(entry.total_hours_spent);
            entry.total_money_spent = round2(entry.total_money_spent);
        }
        Ok(stats)
    }

    /// One row per time entry, salary computed from the employee's hourly
    /// rate at report time.
    pub async fn get_employee_stats_for_company(
        &self,
        db: &DatabaseConnection,
        company_id: Id,
    ) -> Result<Vec<EmployeeStatsRow>, AppError> {
        let rows = TimeEntryRepo::report_rows_for_company(db, company_id).await?;
        Ok(rows
            .into_iter()
            .map(|row| {
                let hours = f64::from(row.duration_minutes) / MINUTES_PER_HOUR;
                EmployeeStatsRow {
                    company_code: row.company_code,
                    project_code: row.project_code,
                    task_code: row.task_code,
                    task_name: row.task_name,
                    employee_display_name: row.employee_display_name,
                    created_at: row.created_at,
                    duration_minutes: row.duration_minutes,
                    salary: round2(hours * row.salary_per_hour),
                }
            })
            .collect())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
