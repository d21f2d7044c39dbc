use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(Company::Table)
                    .col(pk_id_col(Company::Id))
                    .col(ColumnDef::new(Company::Name).string().not_null())
                    .col(ColumnDef::new(Company::Code).string_len(3).not_null())
                    .col(ColumnDef::new(Company::OwnerTgId).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_company_code")
                    .table(Company::Table)
                    .col(Company::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_company_owner_tg_id")
                    .table(Company::Table)
                    .col(Company::OwnerTgId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(Project::Table)
                    .col(pk_id_col(Project::Id))
                    .col(fk_id_col(Project::CompanyId))
                    .col(ColumnDef::new(Project::Name).string().not_null())
                    .col(ColumnDef::new(Project::Code).string_len(3).not_null())
                    .col(timestamp_col(Project::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_company_id")
                            .from(Project::Table, Project::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_project_code")
                    .table(Project::Table)
                    .col(Project::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_project_company_id")
                    .table(Project::Table)
                    .col(Project::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(Employee::Table)
                    .col(pk_id_col(Employee::Id))
                    .col(ColumnDef::new(Employee::TelegramId).big_integer().not_null())
                    .col(fk_id_col(Employee::CompanyId))
                    .col(ColumnDef::new(Employee::IsActive).boolean().not_null())
                    .col(ColumnDef::new(Employee::IsAdmin).boolean().not_null())
                    .col(timestamp_col(Employee::CreatedAt))
                    .col(ColumnDef::new(Employee::SalaryPerHour).double().not_null())
                    .col(ColumnDef::new(Employee::DisplayName).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_company_id")
                            .from(Employee::Table, Employee::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_employee_telegram_id_company_id")
                    .table(Employee::Table)
                    .col(Employee::TelegramId)
                    .col(Employee::CompanyId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_employee_company_id")
                    .table(Employee::Table)
                    .col(Employee::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(Task::Table)
                    .col(pk_id_col(Task::Id))
                    .col(fk_id_col(Task::ProjectId))
                    .col(ColumnDef::new(Task::Name).string().not_null())
                    .col(ColumnDef::new(Task::Code).integer().not_null())
                    .col(ColumnDef::new(Task::Description).text().not_null())
                    .col(ColumnDef::new(Task::Deadline).timestamp().not_null())
                    .col(timestamp_col(Task::CreatedAt))
                    .col(ColumnDef::new(Task::AssigneeUserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Task::Status)
                            .string_len(32)
                            .not_null()
                            .default(Expr::val("new")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_task_project_id")
                            .from(Task::Table, Task::ProjectId)
                            .to(Project::Table, Project::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_task_code_project_id")
                    .table(Task::Table)
                    .col(Task::Code)
                    .col(Task::ProjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_task_project_id")
                    .table(Task::Table)
                    .col(Task::ProjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_task_assignee_user_id")
                    .table(Task::Table)
                    .col(Task::AssigneeUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_task_deadline")
                    .table(Task::Table)
                    .col(Task::Deadline)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .if_not_exists()
                    .table(TimeTrackingEntry::Table)
                    .col(pk_id_col(TimeTrackingEntry::Id))
                    .col(fk_id_col(TimeTrackingEntry::TaskId))
                    .col(fk_id_col(TimeTrackingEntry::EmployeeId))
                    .col(
                        ColumnDef::new(TimeTrackingEntry::DurationMinutes)
                            .integer()
                            .not_null(),
                    )
                    .col(timestamp_col(TimeTrackingEntry::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_time_tracking_entry_task_id")
                            .from(TimeTrackingEntry::Table, TimeTrackingEntry::TaskId)
                            .to(Task::Table, Task::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_time_tracking_entry_employee_id")
                            .from(TimeTrackingEntry::Table, TimeTrackingEntry::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_time_tracking_entry_task_id_employee_id")
                    .table(TimeTrackingEntry::Table)
                    .col(TimeTrackingEntry::TaskId)
                    .col(TimeTrackingEntry::EmployeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("ix_time_tracking_entry_created_at")
                    .table(TimeTrackingEntry::Table)
                    .col(TimeTrackingEntry::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TimeTrackingEntry::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Task::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employee::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Project::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Company::Table).to_owned())
            .await?;
        Ok(())
    }
}

fn pk_id_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn fk_id_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col).integer().not_null().to_owned()
}

fn timestamp_col<T: Iden>(col: T) -> ColumnDef {
    ColumnDef::new(col).timestamp().not_null().to_owned()
}

#[derive(Iden)]
enum Company {
    Table,
    Id,
    Name,
    Code,
    OwnerTgId,
}

#[derive(Iden)]
enum Project {
    Table,
    Id,
    CompanyId,
    Name,
    Code,
    CreatedAt,
}

#[derive(Iden)]
enum Employee {
    Table,
    Id,
    TelegramId,
    CompanyId,
    IsActive,
    IsAdmin,
    CreatedAt,
    SalaryPerHour,
    DisplayName,
}

#[derive(Iden)]
enum Task {
    Table,
    Id,
    ProjectId,
    Name,
    Code,
    Description,
    Deadline,
    CreatedAt,
    AssigneeUserId,
    Status,
}

#[derive(Iden)]
enum TimeTrackingEntry {
    Table,
    Id,
    TaskId,
    EmployeeId,
    DurationMinutes,
    CreatedAt,
}
