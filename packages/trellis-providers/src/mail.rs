use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

#[derive(Clone, Debug)]
pub struct EmailMessage {
	pub to: String,
	pub subject: String,
	pub html: String,
}

/// Sends one transactional email and returns the provider's message id.
pub async fn send(cfg: &trellis_config::MailProviderConfig, message: &EmailMessage) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"from": cfg.from_email,
		"to": [message.to],
		"subject": message.subject,
		"html": message.html,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_send_response(&json)
}

fn parse_send_response(json: &Value) -> Result<String> {
	json.get("id").and_then(Value::as_str).map(str::to_string).ok_or_else(|| {
		Error::InvalidResponse { message: "Mail response is missing the message id.".to_string() }
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extracts_message_id() {
		let json = serde_json::json!({ "id": "4ef0945f-7a1f-4e48-9f3e-9d7b5f6f29aa" });

		assert_eq!(
			parse_send_response(&json).expect("parse failed"),
			"4ef0945f-7a1f-4e48-9f3e-9d7b5f6f29aa",
		);
	}

	#[test]
	fn rejects_response_without_id() {
		let err = parse_send_response(&serde_json::json!({ "ok": true }))
			.expect_err("expected missing id error");

		assert!(err.to_string().contains("message id"));
	}
}
