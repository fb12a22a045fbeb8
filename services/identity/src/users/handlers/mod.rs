//! 用户资料 HTTP 接口处理模块。

mod http;

pub(crate) use http::{delete_me_handler, me_handler, update_me_handler};
