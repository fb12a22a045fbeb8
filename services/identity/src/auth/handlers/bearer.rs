//! Bearer 令牌提取与校验。

use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use ids_shared_protocol::TokenClaims;
use tracing::debug;

use crate::{api::error::ApiError, state::AppState};

/// 从 `Authorization: Bearer <token>` 中取出令牌。
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let missing = || {
        ApiError::new(
            StatusCode::UNAUTHORIZED,
            "MISSING_CREDENTIALS",
            "缺少有效的 Authorization 头",
            "请使用 Bearer 令牌访问",
        )
    };
    let raw = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(missing)?;
    let Some((scheme, token)) = raw.split_once(' ') else {
        return Err(missing());
    };
    let token = token.trim();
    if scheme != "Bearer" || token.is_empty() || token.contains(' ') {
        return Err(missing());
    }
    Ok(token)
}

impl AppState {
    /// 校验请求令牌并返回 claims。
    pub(crate) fn authorize_bearer(&self, headers: &HeaderMap) -> Result<TokenClaims, ApiError> {
        let token = bearer_token(headers)?;
        self.auth.authenticate(token).map_err(|err| {
            if err.is_unauthorized() {
                debug!("bearer token rejected: {err}");
            }
            ApiError::from(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};

    use super::bearer_token;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn rejects_missing_or_foreign_schemes() {
        assert!(bearer_token(&HeaderMap::new()).is_err());
        for value in ["abc.def.ghi", "Basic abc", "Bearer ", "bearer abc", "Bearer a b"] {
            let err = bearer_token(&headers(value)).unwrap_err();
            assert_eq!(err.code, "MISSING_CREDENTIALS", "header {value:?}");
        }
    }
}
