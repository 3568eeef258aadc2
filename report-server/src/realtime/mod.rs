//! 实时推送
//!
//! - [`SubscriberRegistry`]: topic → connection 多重映射，连接级生命周期
//! - [`Notifier`]: 事件目录的发布门面，尽力投递，不影响业务事务

pub mod notifier;
pub mod registry;

pub use notifier::Notifier;
pub use registry::{ConnectionHandle, SubscriberRegistry};
