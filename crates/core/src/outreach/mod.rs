//! Templated outreach: placeholder rendering and sequential mail dispatch.

pub mod dispatch;
pub mod smtp;
pub mod template;

pub use dispatch::{DispatchEngine, MailChannel, OutboundMessage};
pub use smtp::SmtpChannel;
pub use template::render;
