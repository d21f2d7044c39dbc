use std::fmt;

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Entity family an error refers to. Tagging errors with the family keeps
/// translation data-driven instead of dispatching on error types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Company,
    Project,
    Employee,
    Task,
    TimeEntry,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Company => "company",
            EntityKind::Project => "project",
            EntityKind::Employee => "employee",
            EntityKind::Task => "task",
            EntityKind::TimeEntry => "time tracking entry",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application error taxonomy. Repository-mediated writes translate
/// storage failures into `NotFound`/`AlreadyExists`; services add
/// `AccessDenied`/`InvalidCode`. Anything else stays a raw `Database`
/// error and is not part of the recoverable taxonomy.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(EntityKind),
    #[error("{0} access denied: {1}")]
    AccessDenied(EntityKind, &'static str),
    #[error("{0} already exists: {1}")]
    AlreadyExists(EntityKind, String),
    #[error("invalid {0} code: {1}")]
    InvalidCode(EntityKind, &'static str),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl AppError {
    /// Display string for the presentation boundary. Recoverable kinds map
    /// to a fixed user-facing message; everything else falls back to the
    /// error's own rendering.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(kind) => format!("{} not found", capitalize(kind.as_str())),
            AppError::AccessDenied(_, reason) => capitalize(reason),
            AppError::AlreadyExists(kind, _) => {
                format!("{} already exists", capitalize(kind.as_str()))
            }
            AppError::InvalidCode(_, reason) => capitalize(reason),
            other => other.to_string(),
        }
    }
}

/// Maps a unique-constraint violation onto `AlreadyExists` for the given
/// entity family, carrying the violated constraint's description. Other
/// storage errors pass through untranslated.
pub(crate) fn translate_unique_violation(kind: EntityKind, err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(constraint)) => {
            AppError::AlreadyExists(kind, constraint)
        }
        _ => AppError::Database(err),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
