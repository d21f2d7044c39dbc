use db::error::{AppError, EntityKind};

pub mod company;
pub mod employee;
pub mod project;
pub mod task;
pub mod time_tracking;

/// Uppercases a short code and enforces the three-letter format shared by
/// companies and projects. Runs before any storage call.
pub(crate) fn normalize_code(kind: EntityKind, code: &str) -> Result<String, AppError> {
    let code = code.to_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::InvalidCode(kind, "code must be exactly 3 letters"));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_uppercased_and_validated() {
        assert_eq!(
            normalize_code(EntityKind::Company, "tst").unwrap(),
            "TST"
        );
        assert_eq!(
            normalize_code(EntityKind::Company, "TsT").unwrap(),
            "TST"
        );

        for bad in ["ts", "test", "T12", "", "A B"] {
            assert!(matches!(
                normalize_code(EntityKind::Company, bad),
                Err(AppError::InvalidCode(EntityKind::Company, _))
            ));
        }
    }
}
