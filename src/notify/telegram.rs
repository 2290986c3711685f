//! Telegram Bot API notifier

use super::message::Message;
use super::traits::Notifier;
use crate::error::NotifyError;
use crate::net::HttpClient;

use serde_json::Value;

/// Sends messages to a single Telegram chat
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    http: HttpClient,
    api_base: String,
    bot_token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(
        http: HttpClient,
        api_base: impl Into<String>,
        bot_token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base.trim_end_matches('/'),
            self.bot_token,
            method
        )
    }
}

impl Notifier for TelegramNotifier {
    fn send(&self, message: &Message) -> Result<(), NotifyError> {
        let form = [
            ("chat_id", self.chat_id.clone()),
            ("text", message.as_html().to_string()),
            ("parse_mode", "HTML".to_string()),
            ("disable_web_page_preview", "true".to_string()),
        ];

        let body = self
            .http
            .post_form("telegram.sendMessage", &self.method_url("sendMessage"), &form)?;
        check_ok(&body)?;
        Ok(())
    }

    fn verify(&self) -> Result<(), NotifyError> {
        let body = self
            .http
            .get_json("telegram.getMe", &self.method_url("getMe"), &[])?;
        let result = check_ok(&body)?;

        if let Some(username) = result.get("username").and_then(Value::as_str) {
            log::info!("Telegram bot verified as @{}", username);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "telegram"
    }
}

/// Check the Bot API envelope and return its `result`
fn check_ok(body: &Value) -> Result<&Value, NotifyError> {
    if body.get("ok").and_then(Value::as_bool) == Some(true) {
        return Ok(body.get("result").unwrap_or(&Value::Null));
    }

    let description = body
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or("response did not report ok");
    Err(NotifyError::Rejected(description.to_string()))
}
