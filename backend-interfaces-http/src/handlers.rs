use std::str::FromStr;

use backend_domain::DomainError;

use crate::error::HttpError;

pub mod analytics_handlers;
pub mod item_handlers;
pub mod movement_request_handlers;
pub mod ops_handlers;
pub mod user_handlers;

fn parse_field<T>(raw: &str) -> Result<T, HttpError>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse().map_err(HttpError::from)
}
