//! 鉴权模块：令牌、口令哈希、鉴权编排与接口处理。

pub(crate) mod handlers;
pub(crate) mod password;
pub(crate) mod service;
pub(crate) mod token;
