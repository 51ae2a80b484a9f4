use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::GatewayError;

/// `None` when no `Authorization` header is present at all.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, GatewayError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| GatewayError::unauthorized("malformed authorization header"))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or("");
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(GatewayError::unauthorized("invalid authorization scheme"));
    }

    let token = parts.next().unwrap_or("");
    if token.is_empty() {
        return Err(GatewayError::unauthorized("missing bearer token"));
    }

    Ok(Some(token.to_string()))
}

pub fn require_bearer(headers: &HeaderMap) -> Result<String, GatewayError> {
    bearer_token(headers)?.ok_or_else(|| GatewayError::unauthorized("missing authorization header"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    #[test]
    fn require_bearer_extracts_token_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer TOKEN123"));

        let token = require_bearer(&headers).expect("token should be extracted");
        assert_eq!(token, "TOKEN123");
    }

    #[test]
    fn require_bearer_rejects_missing_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));

        let error = require_bearer(&headers).expect_err("should reject missing token");
        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
        assert!(error.to_string().contains("missing bearer token"));
    }

    #[test]
    fn bearer_token_is_optional() {
        assert!(bearer_token(&HeaderMap::new()).unwrap().is_none());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());
    }
}
