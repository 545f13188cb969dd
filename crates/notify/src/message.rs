use chrono::{TimeZone, Utc};

use common::{NotificationEvent, Signal};

/// A notification rendered once and handed to every channel.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMessage {
    pub subject: String,
    /// Telegram-flavoured HTML body.
    pub text: String,
    /// E-mail HTML body.
    pub html: String,
}

/// Render a transition event for `asset` (e.g. "Solana").
/// Returns `None` for Hold, which is never a notification subject.
pub fn render(event: &NotificationEvent, asset: &str) -> Option<RenderedMessage> {
    let label = match event.signal {
        Signal::Buy => "BUY",
        Signal::Sell => "SELL",
        Signal::Hold => return None,
    };
    let when = format_timestamp(event.timestamp_millis);
    // Subject is a plain-text header; only the bodies are HTML.
    let subject = format!("{asset} {label} signal - {when}");
    let asset = escape_html(asset);

    let text = format!(
        "🚨 <b>{asset} {label} signal</b> 🚨\n\n\
         📅 <b>Time:</b> {when}\n\
         💰 <b>Price:</b> ${price:.2}\n\
         📈 <b>Short MA:</b> ${short:.2}\n\
         📉 <b>Long MA:</b> ${long:.2}\n\
         🔔 <b>Signal:</b> {label}",
        price = event.price,
        short = event.short_ma,
        long = event.long_ma,
    );

    let html = format!(
        "<h2>{asset} {label} signal</h2>\
         <p><strong>Time:</strong> {when}</p>\
         <p><strong>Price:</strong> ${price:.2}</p>\
         <p><strong>Short MA:</strong> ${short:.2}</p>\
         <p><strong>Long MA:</strong> ${long:.2}</p>\
         <p><strong>Signal:</strong> {label}</p>",
        price = event.price,
        short = event.short_ma,
        long = event.long_ma,
    );

    Some(RenderedMessage {
        subject,
        text,
        html,
    })
}

/// `YYYY-MM-DD HH:MM:SS UTC`; out-of-range inputs fall back to the raw millis.
pub fn format_timestamp(millis: i64) -> String {
    match Utc.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => format!("{millis} ms"),
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
