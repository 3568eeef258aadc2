//! 操作者身份
//!
//! 客户端通过请求头自报姓名和角色，服务端不做校验（已知缺口，保留现状）：
//! - [`CurrentActor`] - 从 `X-Actor-Name` / `X-Actor-Role` 提取的操作者

pub mod extractor;

pub use extractor::{ACTOR_NAME_HEADER, ACTOR_ROLE_HEADER, CurrentActor};
