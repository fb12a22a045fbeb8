//! 当前用户资料路由处理函数：均要求 Bearer 令牌。

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::HeaderMap,
};
use ids_shared_protocol::{DeleteUserData, UpdateUserRequest, UserProfile};

use crate::{
    api::{
        error::ApiError,
        response::{ApiReply, success},
    },
    state::AppState,
};

/// 读取当前用户资料。
pub(crate) async fn me_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiReply<UserProfile> {
    let claims = match state.authorize_bearer(&headers) {
        Ok(claims) => claims,
        Err(err) => return err.into_reply(),
    };
    match state.auth.get_user(&claims.user_id).await {
        Ok(profile) => success("获取成功", "", profile),
        Err(err) => ApiError::from(err).into_reply(),
    }
}

/// 更新当前用户资料。
pub(crate) async fn update_me_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiReply<UserProfile> {
    let claims = match state.authorize_bearer(&headers) {
        Ok(claims) => claims,
        Err(err) => return err.into_reply(),
    };
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return ApiError::from(rejection).into_reply(),
    };
    match state.auth.update_user(&claims.user_id, req).await {
        Ok(profile) => success(
            "资料已更新",
            "用户名变更后请重新登录以刷新令牌",
            profile,
        ),
        Err(err) => ApiError::from(err).into_reply(),
    }
}

/// 删除当前用户。
pub(crate) async fn delete_me_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiReply<DeleteUserData> {
    let claims = match state.authorize_bearer(&headers) {
        Ok(claims) => claims,
        Err(err) => return err.into_reply(),
    };
    match state.auth.delete_user(&claims.user_id).await {
        Ok(()) => success(
            "账号已删除",
            "",
            DeleteUserData {
                id: claims.user_id,
            },
        ),
        Err(err) => ApiError::from(err).into_reply(),
    }
}
