//! 用户模块：记录模型、内存存储与资料接口。

pub(crate) mod handlers;
pub(crate) mod model;
pub(crate) mod store;
