//! 注册与登录路由处理函数。

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use ids_shared_protocol::{LoginData, LoginRequest, RegisterRequest, UserProfile};

use crate::{
    api::{
        error::ApiError,
        response::{ApiReply, created, success},
    },
    state::AppState,
};

/// 注册接口。
pub(crate) async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiReply<UserProfile> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return ApiError::from(rejection).into_reply(),
    };
    match state.auth.register(req).await {
        Ok(profile) => created("注册成功", "请使用新账号登录", profile),
        Err(err) => ApiError::from(err).into_reply(),
    }
}

/// 登录接口：成功返回 Bearer 令牌。
pub(crate) async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiReply<LoginData> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return ApiError::from(rejection).into_reply(),
    };
    match state.auth.login(req).await {
        Ok(data) => success("登录成功", "请在 Authorization 头中携带令牌", data),
        Err(err) => ApiError::from(err).into_reply(),
    }
}
