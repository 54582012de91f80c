use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use trellis_config::Error;

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_temp_config(contents: &str) -> PathBuf {
	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("Clock before epoch.")
		.subsec_nanos();
	let unique = COUNTER.fetch_add(1, Ordering::Relaxed);
	let path = env::temp_dir().join(format!("trellis_config_{nanos}_{unique}.toml"));

	fs::write(&path, contents).expect("Failed to write temp config.");

	path
}

fn with_edit(edit: impl FnOnce(&mut toml::Table)) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let root = value.as_table_mut().expect("Sample config must be a table.");

	edit(root);

	toml::to_string(&value).expect("Failed to render sample config.")
}

#[test]
fn loads_sample_config() {
	let path = write_temp_config(SAMPLE_CONFIG_TOML);
	let cfg = trellis_config::load(&path).expect("Sample config must load.");

	assert_eq!(cfg.service.http_bind, "127.0.0.1:8080");
	assert_eq!(cfg.storage.postgres.pool_max_conns, 8);
	assert_eq!(cfg.providers.completion.model, "gpt-4o-mini");

	fs::remove_file(path).ok();
}

#[test]
fn strips_trailing_slash_from_provider_bases() {
	let rendered = with_edit(|root| {
		let providers = root
			.get_mut("providers")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [providers].");
		let mail = providers
			.get_mut("mail")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [providers.mail].");

		mail.insert(
			"api_base".to_string(),
			Value::String("https://api.resend.com/".to_string()),
		);
	});
	let path = write_temp_config(&rendered);
	let cfg = trellis_config::load(&path).expect("Config must load.");

	assert_eq!(cfg.providers.mail.api_base, "https://api.resend.com");

	fs::remove_file(path).ok();
}

#[test]
fn rejects_empty_provider_api_key() {
	let rendered = with_edit(|root| {
		let providers = root
			.get_mut("providers")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [providers].");
		let weather = providers
			.get_mut("weather")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [providers.weather].");

		weather.insert("api_key".to_string(), Value::String(" ".to_string()));
	});
	let path = write_temp_config(&rendered);
	let err = trellis_config::load(&path).expect_err("Blank api_key must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));
	assert!(err.to_string().contains("weather api_key"));

	fs::remove_file(path).ok();
}

#[test]
fn rejects_zero_pool_size() {
	let rendered = with_edit(|root| {
		let storage = root
			.get_mut("storage")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [storage].");
		let postgres = storage
			.get_mut("postgres")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [storage.postgres].");

		postgres.insert("pool_max_conns".to_string(), Value::Integer(0));
	});
	let path = write_temp_config(&rendered);
	let err = trellis_config::load(&path).expect_err("Zero pool size must be rejected.");

	assert!(err.to_string().contains("pool_max_conns"));

	fs::remove_file(path).ok();
}

#[test]
fn rejects_out_of_range_temperature() {
	let rendered = with_edit(|root| {
		let providers = root
			.get_mut("providers")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [providers].");
		let completion = providers
			.get_mut("completion")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [providers.completion].");

		completion.insert("temperature".to_string(), Value::Float(3.5));
	});
	let path = write_temp_config(&rendered);
	let err = trellis_config::load(&path).expect_err("Out-of-range temperature must be rejected.");

	assert!(err.to_string().contains("temperature"));

	fs::remove_file(path).ok();
}

#[test]
fn rejects_frost_threshold_above_heat_threshold() {
	let rendered = with_edit(|root| {
		let weather = root
			.get_mut("weather")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [weather].");

		weather.insert("frost_temp_c".to_string(), Value::Float(40.0));
	});
	let path = write_temp_config(&rendered);
	let err = trellis_config::load(&path).expect_err("Inverted thresholds must be rejected.");

	assert!(err.to_string().contains("frost_temp_c"));

	fs::remove_file(path).ok();
}
