//! 鉴权 HTTP 接口处理模块。

mod bearer;
mod http;

pub(crate) use http::{login_handler, register_handler};
