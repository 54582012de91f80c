use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use trellis_config::WeatherThresholds;
use trellis_providers::weather::{CurrentWeather, ForecastDay};

use crate::{Error, Result, TrellisService};

pub const MAX_FORECAST_DAYS: u32 = 7;

#[derive(Clone, Debug, Serialize)]
pub struct WeatherReport {
	pub location: String,
	#[serde(with = "crate::time_serde")]
	pub timestamp: OffsetDateTime,
	pub temperature_c: f64,
	pub humidity: Option<f64>,
	pub wind_kmph: Option<f64>,
	pub wind_direction: Option<String>,
	pub cloud_cover: Option<f64>,
	pub precipitation_mm: Option<f64>,
	pub uv_index: Option<f64>,
	pub condition: Option<String>,
	pub forecast: Vec<ForecastItem>,
	pub plant_hazards: Vec<String>,
	pub gardening_advice: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ForecastItem {
	pub date: String,
	pub min_temp_c: f64,
	pub max_temp_c: f64,
	pub uv_index: Option<f64>,
	pub precipitation_mm: Option<f64>,
	pub condition: Option<String>,
}
impl From<ForecastDay> for ForecastItem {
	fn from(day: ForecastDay) -> Self {
		Self {
			date: day.date,
			min_temp_c: day.min_temp_c,
			max_temp_c: day.max_temp_c,
			uv_index: day.uv_index,
			precipitation_mm: day.precipitation_mm,
			condition: day.condition,
		}
	}
}

impl TrellisService {
	pub async fn current_weather(&self, location: &str) -> Result<WeatherReport> {
		let location = non_blank(location)?;
		let current = self
			.providers
			.weather
			.current(&self.cfg.providers.weather, location)
			.await
			.map_err(|err| Error::Provider { message: err.to_string() })?;

		Ok(self.report(location.to_string(), current, Vec::new()))
	}

	pub async fn current_weather_by_coordinates(
		&self,
		latitude: f64,
		longitude: f64,
	) -> Result<WeatherReport> {
		validate_coordinates(latitude, longitude)?;

		self.current_weather(&format!("{latitude},{longitude}")).await
	}

	pub async fn weather_forecast(&self, location: &str, days: u32) -> Result<WeatherReport> {
		let location = non_blank(location)?;

		if days == 0 || days > MAX_FORECAST_DAYS {
			return Err(Error::InvalidRequest {
				message: format!("days must be between 1 and {MAX_FORECAST_DAYS}."),
			});
		}

		let cfg = &self.cfg.providers.weather;
		let current = self
			.providers
			.weather
			.current(cfg, location)
			.await
			.map_err(|err| Error::Provider { message: err.to_string() })?;
		let forecast = self
			.providers
			.weather
			.forecast(cfg, location, days)
			.await
			.map_err(|err| Error::Provider { message: err.to_string() })?;

		Ok(self.report(
			location.to_string(),
			current,
			forecast.into_iter().map(ForecastItem::from).collect(),
		))
	}

	pub async fn weather_forecast_by_coordinates(
		&self,
		latitude: f64,
		longitude: f64,
		days: u32,
	) -> Result<WeatherReport> {
		validate_coordinates(latitude, longitude)?;

		self.weather_forecast(&format!("{latitude},{longitude}"), days).await
	}

	/// Current conditions plus hazard and advice lines for the garden. When a
	/// plan id is supplied, its plant count is folded into the advice.
	pub async fn garden_weather(
		&self,
		location: &str,
		garden_plan_id: Option<Uuid>,
	) -> Result<WeatherReport> {
		let mut report = self.current_weather(location).await?;
		let plant_count = match garden_plan_id {
			Some(garden_plan_id) => {
				let count: i64 =
					sqlx::query_scalar("SELECT count(*) FROM plants WHERE garden_plan_id = $1")
						.bind(garden_plan_id)
						.fetch_one(&self.db.pool)
						.await?;

				Some(count)
			},
			None => None,
		};

		report.gardening_advice =
			Some(gardening_advice(&report, &self.cfg.weather, plant_count));

		Ok(report)
	}

	fn report(
		&self,
		location: String,
		current: CurrentWeather,
		forecast: Vec<ForecastItem>,
	) -> WeatherReport {
		let mut report = WeatherReport {
			location,
			timestamp: OffsetDateTime::now_utc(),
			temperature_c: current.temperature_c,
			humidity: current.humidity,
			wind_kmph: current.wind_kmph,
			wind_direction: current.wind_direction,
			cloud_cover: current.cloud_cover,
			precipitation_mm: current.precipitation_mm,
			uv_index: current.uv_index,
			condition: current.condition,
			forecast,
			plant_hazards: Vec::new(),
			gardening_advice: None,
		};

		report.plant_hazards = plant_hazards(&report, &self.cfg.weather);

		report
	}
}

fn non_blank(location: &str) -> Result<&str> {
	let location = location.trim();

	if location.is_empty() {
		return Err(Error::InvalidRequest { message: "location is required.".to_string() });
	}

	Ok(location)
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
	if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
		return Err(Error::InvalidRequest {
			message: "latitude must be in [-90, 90] and longitude in [-180, 180].".to_string(),
		});
	}

	Ok(())
}

fn plant_hazards(report: &WeatherReport, thresholds: &WeatherThresholds) -> Vec<String> {
	let mut hazards = Vec::new();

	if report.temperature_c <= thresholds.frost_temp_c {
		hazards.push("Frost risk: cover tender plants or move pots indoors.".to_string());
	}
	if report.temperature_c >= thresholds.high_temp_c {
		hazards.push("Heat stress: shade sensitive plants and water early or late.".to_string());
	}
	if report.wind_kmph.is_some_and(|wind| wind >= thresholds.wind_kmph) {
		hazards.push("Strong winds: stake tall plants and secure covers.".to_string());
	}
	if report.precipitation_mm.is_some_and(|rain| rain >= thresholds.heavy_rain_mm) {
		hazards.push("Heavy rain: check drainage and hold off on fertilizing.".to_string());
	}
	if report.uv_index.is_some_and(|uv| uv >= thresholds.high_uv_index) {
		hazards.push("High UV: young seedlings may scorch without shade cloth.".to_string());
	}

	hazards
}

fn gardening_advice(
	report: &WeatherReport,
	thresholds: &WeatherThresholds,
	plant_count: Option<i64>,
) -> String {
	let mut advice = if report.plant_hazards.is_empty() {
		"Conditions look good for general garden work.".to_string()
	} else {
		report.plant_hazards.join(" ")
	};

	if report.temperature_c > thresholds.frost_temp_c
		&& report.temperature_c < thresholds.high_temp_c
		&& report.precipitation_mm.is_none_or(|rain| rain < thresholds.heavy_rain_mm)
	{
		advice.push_str(" A mild window like this suits planting and transplanting.");
	}
	if let Some(count) = plant_count.filter(|count| *count > 0) {
		advice.push_str(&format!(" Your plan tracks {count} plants; walk through and check each one."));
	}

	advice
}

#[cfg(test)]
mod tests {
	use time::OffsetDateTime;
	use trellis_config::WeatherThresholds;

	use super::{WeatherReport, gardening_advice, plant_hazards};

	fn thresholds() -> WeatherThresholds {
		WeatherThresholds {
			wind_kmph: 30.0,
			high_temp_c: 32.0,
			frost_temp_c: 2.0,
			heavy_rain_mm: 10.0,
			high_uv_index: 8.0,
		}
	}

	fn report(temperature_c: f64) -> WeatherReport {
		WeatherReport {
			location: "Testville".to_string(),
			timestamp: OffsetDateTime::UNIX_EPOCH,
			temperature_c,
			humidity: None,
			wind_kmph: None,
			wind_direction: None,
			cloud_cover: None,
			precipitation_mm: None,
			uv_index: None,
			condition: None,
			forecast: Vec::new(),
			plant_hazards: Vec::new(),
			gardening_advice: None,
		}
	}

	#[test]
	fn mild_weather_has_no_hazards() {
		assert!(plant_hazards(&report(20.0), &thresholds()).is_empty());
	}

	#[test]
	fn frost_and_wind_both_report() {
		let mut cold = report(0.0);

		cold.wind_kmph = Some(40.0);

		let hazards = plant_hazards(&cold, &thresholds());

		assert_eq!(hazards.len(), 2);
		assert!(hazards[0].contains("Frost"));
		assert!(hazards[1].contains("winds"));
	}

	#[test]
	fn advice_mentions_tracked_plants() {
		let advice = gardening_advice(&report(20.0), &thresholds(), Some(4));

		assert!(advice.contains("4 plants"));
	}

	#[test]
	fn hazard_lines_flow_into_advice() {
		let mut hot = report(35.0);

		hot.plant_hazards = plant_hazards(&hot, &thresholds());

		let advice = gardening_advice(&hot, &thresholds(), None);

		assert!(advice.contains("Heat stress"));
		assert!(!advice.contains("mild window"));
	}
}
