pub mod channel;
pub mod dispatcher;
pub mod email;
pub mod message;
pub mod telegram;

pub use channel::NotificationChannel;
pub use dispatcher::{DispatchSummary, NotificationDispatcher};
pub use email::EmailChannel;
pub use message::{render, RenderedMessage};
pub use telegram::TelegramChannel;
