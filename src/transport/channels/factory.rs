use crate::config::NotifyConfig;
use crate::transport::channels::{
    BarkChannel, Channel, ServerChanChannel, TelegramChannel, WeComChannel,
};
use std::time::Duration;

/// Push requests are small; anything slower than this is treated as lost.
const PUSH_TIMEOUT: Duration = Duration::from_secs(5);

fn push_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(PUSH_TIMEOUT)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("push client builder failed ({e}); using defaults");
            reqwest::Client::new()
        })
}

/// Every push channel enabled in `notify`, in a fixed order.
pub fn build_channels(notify: &NotifyConfig) -> Vec<Box<dyn Channel>> {
    let mut channels: Vec<Box<dyn Channel>> = Vec::with_capacity(4);
    let client = push_client();

    if let Some(bark) = &notify.bark {
        channels.push(Box::new(BarkChannel::new(bark.url.clone(), client.clone())));
    }

    if let Some(sc) = &notify.serverchan {
        channels.push(Box::new(ServerChanChannel::new(
            sc.api_base.clone(),
            sc.send_key.clone(),
            client.clone(),
        )));
    }

    if let Some(wc) = &notify.wecom {
        channels.push(Box::new(WeComChannel::new(
            wc.webhook_url.clone(),
            client.clone(),
        )));
    }

    if let Some(tg) = &notify.telegram {
        channels.push(Box::new(TelegramChannel::new(
            tg.api_base.clone(),
            tg.bot_token.clone(),
            tg.user_id.clone(),
            client,
        )));
    }

    channels
}
