use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::Result;

/// Looks up one photo URL for a search term. A search with no hits is not an
/// error; it returns `None`.
pub async fn search_photo(
	cfg: &trellis_config::ImageSearchProviderConfig,
	query: &str,
) -> Result<Option<String>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let res = client
		.get(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.query(&[("query", query), ("per_page", "1")])
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(parse_photo_response(&json))
}

fn parse_photo_response(json: &Value) -> Option<String> {
	json.pointer("/results/0/urls/small").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extracts_first_photo_url() {
		let json = serde_json::json!({
			"results": [
				{ "urls": { "small": "https://images.example/basil-small.jpg" } },
				{ "urls": { "small": "https://images.example/ignored.jpg" } }
			]
		});

		assert_eq!(
			parse_photo_response(&json).as_deref(),
			Some("https://images.example/basil-small.jpg"),
		);
	}

	#[test]
	fn empty_results_yield_none() {
		assert_eq!(parse_photo_response(&serde_json::json!({ "results": [] })), None);
	}
}
