use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "review")]
    Review,
    #[sea_orm(string_value = "done")]
    Done,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Page selection for list queries. Values below the minimum fall back to
/// the defaults rather than being rejected.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub order_by: String,
    pub ascending: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            order_by: "id".to_string(),
            ascending: true,
        }
    }
}

impl Pagination {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page,
            page_size,
            ..Self::default()
        }
        .clamped()
    }

    pub fn ordered_by(mut self, order_by: impl Into<String>, ascending: bool) -> Self {
        self.order_by = order_by.into();
        self.ascending = ascending;
        self
    }

    pub fn clamped(mut self) -> Self {
        if self.page < 1 {
            self.page = DEFAULT_PAGE;
        }
        if self.page_size < 1 {
            self.page_size = DEFAULT_PAGE_SIZE;
        }
        self
    }
}

/// One slice of a filtered, ordered result set. `total` counts all rows
/// matching the filter, independent of the page bounds.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_values_below_minimum() {
        let pagination = Pagination::new(0, 0);
        assert_eq!(pagination.page, DEFAULT_PAGE);
        assert_eq!(pagination.page_size, DEFAULT_PAGE_SIZE);

        let pagination = Pagination::new(3, 25);
        assert_eq!(pagination.page, 3);
        assert_eq!(pagination.page_size, 25);
    }

    #[test]
    fn task_status_round_trips_through_strings() {
        use std::str::FromStr;

        assert_eq!(TaskStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            TaskStatus::from_str("canceled").unwrap(),
            TaskStatus::Canceled
        );
        assert_eq!(TaskStatus::default(), TaskStatus::New);
    }
}
