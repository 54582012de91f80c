use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub weather: WeatherThresholds,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub weather: WeatherProviderConfig,
	pub completion: CompletionProviderConfig,
	pub image_search: ImageSearchProviderConfig,
	pub mail: MailProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct WeatherProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ImageSearchProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct MailProviderConfig {
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub from_email: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Weather readings at or beyond these values produce garden hazards and
/// advice lines.
#[derive(Debug, Deserialize)]
pub struct WeatherThresholds {
	pub wind_kmph: f64,
	pub high_temp_c: f64,
	pub frost_temp_c: f64,
	pub heavy_rain_mm: f64,
	pub high_uv_index: f64,
}
