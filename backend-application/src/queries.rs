use std::str::FromStr;

use backend_domain::DomainError;

use crate::AppError;

pub mod analytics_queries;
pub mod item_queries;
pub mod movement_request_queries;
pub mod user_queries;

const DEFAULT_LIST_LIMIT: usize = 100;

/// Parses an optional query-string filter. Blank values count as absent.
fn parse_optional<T>(value: Option<String>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = DomainError>,
{
    match backend_domain::normalize_optional_text(value) {
        Some(raw) => raw.parse().map(Some).map_err(AppError::from),
        None => Ok(None),
    }
}
