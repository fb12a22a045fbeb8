//! 统一 JSON 包裹：`{ok, code, message, suggestion, data?}`。
//!
//! 成功与失败共用同一结构，失败时不携带 `data`。

use axum::{Json, http::StatusCode};
use serde::Serialize;

const OK_CODE: &str = "OK";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiEnvelope<T> {
    ok: bool,
    code: &'static str,
    message: String,
    suggestion: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

/// handler 统一返回类型。
pub(crate) type ApiReply<T> = (StatusCode, Json<ApiEnvelope<T>>);

/// 200 成功响应。
pub(crate) fn success<T>(message: &str, suggestion: &'static str, data: T) -> ApiReply<T> {
    reply(StatusCode::OK, OK_CODE, message.to_string(), suggestion, Some(data))
}

/// 201 资源已创建。
pub(crate) fn created<T>(message: &str, suggestion: &'static str, data: T) -> ApiReply<T> {
    reply(
        StatusCode::CREATED,
        OK_CODE,
        message.to_string(),
        suggestion,
        Some(data),
    )
}

/// 失败响应；由 `ApiError::into_reply` 使用。
pub(crate) fn failure<T>(
    status: StatusCode,
    code: &'static str,
    message: String,
    suggestion: &'static str,
) -> ApiReply<T> {
    reply(status, code, message, suggestion, None)
}

fn reply<T>(
    status: StatusCode,
    code: &'static str,
    message: String,
    suggestion: &'static str,
    data: Option<T>,
) -> ApiReply<T> {
    let envelope = ApiEnvelope {
        ok: status.is_success(),
        code,
        message,
        suggestion,
        data,
    };
    (status, Json(envelope))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use super::{created, failure, success};

    #[test]
    fn success_carries_data() {
        let (status, body) = success("获取成功", "", json!({"id": "u1"}));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            serde_json::to_value(&body.0).unwrap(),
            json!({
                "ok": true,
                "code": "OK",
                "message": "获取成功",
                "suggestion": "",
                "data": {"id": "u1"},
            })
        );
    }

    #[test]
    fn created_uses_201() {
        let (status, body) = created("注册成功", "请登录", 1u8);
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(serde_json::to_value(&body.0).unwrap()["ok"], true);
    }

    #[test]
    fn failure_omits_data() {
        let (status, body) = failure::<u8>(
            StatusCode::NOT_FOUND,
            "USER_NOT_FOUND",
            "用户不存在".to_string(),
            "请确认账号后重试",
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
        let value = serde_json::to_value(&body.0).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["code"], "USER_NOT_FOUND");
        assert!(value.get("data").is_none());
    }
}
