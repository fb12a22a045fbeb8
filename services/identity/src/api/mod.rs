//! HTTP 边界：统一响应包裹与错误映射。

pub(crate) mod error;
pub(crate) mod response;
