use axum::http::HeaderMap;

use backend_domain::{Actor, Role, RuntimeConfig, UserId};

use crate::error::HttpError;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    if let Some(api_token) = &config.api_token {
        return extract_bearer(headers)
            .map(|v| v == *api_token)
            .unwrap_or(false);
    }
    true
}

/// Checks the shared token and resolves the acting user from the identity
/// headers set by the upstream session layer.
pub fn authenticate(config: &RuntimeConfig, headers: &HeaderMap) -> Result<Actor, HttpError> {
    if !authorize(config, headers) {
        return Err(HttpError::Unauthorized);
    }
    let user_id = header_value(headers, USER_ID_HEADER).ok_or(HttpError::Unauthorized)?;
    let role = header_value(headers, USER_ROLE_HEADER)
        .ok_or(HttpError::Unauthorized)?
        .parse::<Role>()
        .map_err(|_| HttpError::Unauthorized)?;
    Ok(Actor::new(UserId::from(user_id), role))
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?.to_str().ok()?.trim();
    if value.is_empty() {
        return None;
    }
    Some(value.to_string())
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let prefix = "Bearer ";
    if !value.starts_with(prefix) {
        return None;
    }
    let token = value[prefix.len()..].trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn token_is_optional() {
        let config = RuntimeConfig::default();
        assert!(authorize(&config, &HeaderMap::new()));

        let config = RuntimeConfig {
            api_token: Some("s3cret".to_string()),
            ..RuntimeConfig::default()
        };
        assert!(!authorize(&config, &HeaderMap::new()));
        assert!(!authorize(&config, &headers(&[("authorization", "Bearer nope")])));
        assert!(authorize(&config, &headers(&[("authorization", "Bearer s3cret")])));
    }

    #[test]
    fn actor_comes_from_identity_headers() {
        let config = RuntimeConfig::default();
        let actor = authenticate(
            &config,
            &headers(&[("x-user-id", "u-7"), ("x-user-role", "bpo")]),
        )
        .unwrap();
        assert_eq!(actor, Actor::new("u-7", Role::FloorUser));

        let missing_role = authenticate(&config, &headers(&[("x-user-id", "u-7")]));
        assert!(matches!(missing_role, Err(HttpError::Unauthorized)));
        let bad_role = authenticate(
            &config,
            &headers(&[("x-user-id", "u-7"), ("x-user-role", "intern")]),
        );
        assert!(matches!(bad_role, Err(HttpError::Unauthorized)));
    }
}
