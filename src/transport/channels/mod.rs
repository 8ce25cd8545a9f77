pub mod bark;
mod factory;
pub mod serverchan;
pub mod telegram;
pub mod traits;
pub mod wecom;

pub use bark::BarkChannel;
pub use factory::build_channels;
pub use serverchan::{DEFAULT_SERVERCHAN_API, ServerChanChannel};
pub use telegram::{DEFAULT_TELEGRAM_API, TelegramChannel};
pub use traits::{Channel, PushMessage};
pub use wecom::WeComChannel;
