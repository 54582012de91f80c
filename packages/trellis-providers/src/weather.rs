use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// One current-conditions reading. The upstream API serializes every number
/// as a string, so parsing tolerates both forms.
#[derive(Clone, Debug)]
pub struct CurrentWeather {
	pub temperature_c: f64,
	pub humidity: Option<f64>,
	pub wind_kmph: Option<f64>,
	pub wind_direction: Option<String>,
	pub cloud_cover: Option<f64>,
	pub precipitation_mm: Option<f64>,
	pub uv_index: Option<f64>,
	pub condition: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ForecastDay {
	pub date: String,
	pub min_temp_c: f64,
	pub max_temp_c: f64,
	pub uv_index: Option<f64>,
	pub precipitation_mm: Option<f64>,
	pub condition: Option<String>,
}

pub async fn current(
	cfg: &trellis_config::WeatherProviderConfig,
	query: &str,
) -> Result<CurrentWeather> {
	let json = request(cfg, query, 1).await?;

	parse_current(&json)
}

pub async fn forecast(
	cfg: &trellis_config::WeatherProviderConfig,
	query: &str,
	days: u32,
) -> Result<Vec<ForecastDay>> {
	let json = request(cfg, query, days).await?;

	parse_forecast(&json)
}

async fn request(
	cfg: &trellis_config::WeatherProviderConfig,
	query: &str,
	days: u32,
) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let days = days.to_string();
	let res = client
		.get(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.query(&[
			("key", cfg.api_key.as_str()),
			("q", query),
			("num_of_days", days.as_str()),
			("format", "json"),
		])
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(json)
}

fn parse_current(json: &Value) -> Result<CurrentWeather> {
	let condition = json
		.pointer("/data/current_condition/0")
		.ok_or_else(|| Error::InvalidResponse {
			message: "Weather response is missing current_condition.".to_string(),
		})?;
	let temperature_c = text_number(condition, "temp_C").ok_or_else(|| Error::InvalidResponse {
		message: "Weather response is missing temp_C.".to_string(),
	})?;

	Ok(CurrentWeather {
		temperature_c,
		humidity: text_number(condition, "humidity"),
		wind_kmph: text_number(condition, "windspeedKmph"),
		wind_direction: condition
			.get("winddir16Point")
			.and_then(Value::as_str)
			.map(str::to_string),
		cloud_cover: text_number(condition, "cloudcover"),
		precipitation_mm: text_number(condition, "precipMM"),
		uv_index: text_number(condition, "uvIndex"),
		condition: condition
			.pointer("/weatherDesc/0/value")
			.and_then(Value::as_str)
			.map(str::to_string),
	})
}

fn parse_forecast(json: &Value) -> Result<Vec<ForecastDay>> {
	let days = json
		.pointer("/data/weather")
		.and_then(Value::as_array)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Weather response is missing the forecast array.".to_string(),
		})?;
	let mut out = Vec::with_capacity(days.len());

	for day in days {
		let date = day.get("date").and_then(Value::as_str).ok_or_else(|| {
			Error::InvalidResponse {
				message: "Forecast day is missing its date.".to_string(),
			}
		})?;
		let min_temp_c = text_number(day, "mintempC").ok_or_else(|| Error::InvalidResponse {
			message: format!("Forecast day {date} is missing mintempC."),
		})?;
		let max_temp_c = text_number(day, "maxtempC").ok_or_else(|| Error::InvalidResponse {
			message: format!("Forecast day {date} is missing maxtempC."),
		})?;
		let first_hour = day.pointer("/hourly/0");

		out.push(ForecastDay {
			date: date.to_string(),
			min_temp_c,
			max_temp_c,
			uv_index: text_number(day, "uvIndex"),
			precipitation_mm: first_hour.and_then(|hour| text_number(hour, "precipMM")),
			condition: first_hour
				.and_then(|hour| hour.pointer("/weatherDesc/0/value"))
				.and_then(Value::as_str)
				.map(str::to_string),
		});
	}

	Ok(out)
}

/// The upstream API returns numbers as JSON strings ("17"); tolerate plain
/// numbers as well.
fn text_number(value: &Value, key: &str) -> Option<f64> {
	match value.get(key)? {
		Value::String(raw) => raw.trim().parse().ok(),
		other => other.as_f64(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_response() -> Value {
		serde_json::json!({
			"data": {
				"current_condition": [{
					"temp_C": "17",
					"humidity": "68",
					"windspeedKmph": "12",
					"winddir16Point": "WSW",
					"cloudcover": "50",
					"precipMM": "0.2",
					"uvIndex": "4",
					"weatherDesc": [{ "value": "Partly cloudy" }]
				}],
				"weather": [
					{
						"date": "2026-08-07",
						"mintempC": "11",
						"maxtempC": "21",
						"uvIndex": "5",
						"hourly": [{ "precipMM": "0.0", "weatherDesc": [{ "value": "Sunny" }] }]
					},
					{
						"date": "2026-08-08",
						"mintempC": "12",
						"maxtempC": "19",
						"hourly": [{ "precipMM": "3.1", "weatherDesc": [{ "value": "Light rain" }] }]
					}
				]
			}
		})
	}

	#[test]
	fn parses_current_conditions_from_text_numbers() {
		let current = parse_current(&sample_response()).expect("parse failed");

		assert_eq!(current.temperature_c, 17.0);
		assert_eq!(current.humidity, Some(68.0));
		assert_eq!(current.wind_kmph, Some(12.0));
		assert_eq!(current.wind_direction.as_deref(), Some("WSW"));
		assert_eq!(current.condition.as_deref(), Some("Partly cloudy"));
	}

	#[test]
	fn parses_forecast_days_in_order() {
		let forecast = parse_forecast(&sample_response()).expect("parse failed");

		assert_eq!(forecast.len(), 2);
		assert_eq!(forecast[0].date, "2026-08-07");
		assert_eq!(forecast[0].max_temp_c, 21.0);
		assert_eq!(forecast[1].precipitation_mm, Some(3.1));
		assert_eq!(forecast[1].uv_index, None);
	}

	#[test]
	fn rejects_response_without_current_condition() {
		let err = parse_current(&serde_json::json!({ "data": {} }))
			.expect_err("expected missing current_condition error");

		assert!(err.to_string().contains("current_condition"));
	}
}
