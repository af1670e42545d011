//! 服务模块
//!
//! - [`notifier`] - 后台通知队列 (fire-and-forget)

pub mod notifier;

pub use notifier::{LogSink, Notification, Notifier, NotifySink, WebhookSink};
