mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	CompletionProviderConfig, Config, ImageSearchProviderConfig, MailProviderConfig, Postgres,
	Providers, Service, Storage, WeatherProviderConfig, WeatherThresholds,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}

	for (label, key, timeout_ms) in [
		("weather", &cfg.providers.weather.api_key, cfg.providers.weather.timeout_ms),
		("completion", &cfg.providers.completion.api_key, cfg.providers.completion.timeout_ms),
		("image_search", &cfg.providers.image_search.api_key, cfg.providers.image_search.timeout_ms),
		("mail", &cfg.providers.mail.api_key, cfg.providers.mail.timeout_ms),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("Provider {label} timeout_ms must be greater than zero."),
			});
		}
	}

	if !cfg.providers.completion.temperature.is_finite()
		|| !(0.0..=2.0).contains(&cfg.providers.completion.temperature)
	{
		return Err(Error::Validation {
			message: "providers.completion.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if !cfg.providers.mail.from_email.contains('@') {
		return Err(Error::Validation {
			message: "providers.mail.from_email must be an email address.".to_string(),
		});
	}

	for (label, value) in [
		("weather.wind_kmph", cfg.weather.wind_kmph),
		("weather.high_temp_c", cfg.weather.high_temp_c),
		("weather.heavy_rain_mm", cfg.weather.heavy_rain_mm),
		("weather.high_uv_index", cfg.weather.high_uv_index),
	] {
		if !value.is_finite() {
			return Err(Error::Validation {
				message: format!("{label} must be a finite number."),
			});
		}
		if value <= 0.0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}
	if !cfg.weather.frost_temp_c.is_finite() {
		return Err(Error::Validation {
			message: "weather.frost_temp_c must be a finite number.".to_string(),
		});
	}
	if cfg.weather.frost_temp_c >= cfg.weather.high_temp_c {
		return Err(Error::Validation {
			message: "weather.frost_temp_c must be less than weather.high_temp_c.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for base in [
		&mut cfg.providers.weather.api_base,
		&mut cfg.providers.completion.api_base,
		&mut cfg.providers.image_search.api_base,
		&mut cfg.providers.mail.api_base,
	] {
		while base.ends_with('/') {
			base.pop();
		}
	}
}
