use axum::{
	Router,
	extract::{Query, State},
	response::Response,
	routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
	routes::{ApiError, success},
	state::AppState,
};

pub(crate) fn router() -> Router<AppState> {
	Router::new()
		.route("/current", get(current))
		.route("/forecast", get(forecast))
		.route("/garden", get(garden))
}

#[derive(Debug, Deserialize)]
struct LocationParams {
	location: Option<String>,
	latitude: Option<f64>,
	longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastParams {
	days: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GardenParams {
	garden_plan_id: Option<Uuid>,
}

async fn current(
	State(state): State<AppState>,
	Query(params): Query<LocationParams>,
) -> Result<Response, ApiError> {
	let report = match (params.location, params.latitude, params.longitude) {
		(Some(location), _, _) => state.service.current_weather(&location).await?,
		(None, Some(latitude), Some(longitude)) =>
			state.service.current_weather_by_coordinates(latitude, longitude).await?,
		_ =>
			return Err(ApiError::invalid_request(
				"Provide either location or latitude and longitude.",
			)),
	};

	Ok(success("Successfully retrieved current weather", report))
}

async fn forecast(
	State(state): State<AppState>,
	Query(params): Query<LocationParams>,
	Query(days): Query<ForecastParams>,
) -> Result<Response, ApiError> {
	let days = days.days.unwrap_or(3);
	let report = match (params.location, params.latitude, params.longitude) {
		(Some(location), _, _) => state.service.weather_forecast(&location, days).await?,
		(None, Some(latitude), Some(longitude)) =>
			state
				.service
				.weather_forecast_by_coordinates(latitude, longitude, days)
				.await?,
		_ =>
			return Err(ApiError::invalid_request(
				"Provide either location or latitude and longitude.",
			)),
	};

	Ok(success("Successfully retrieved weather forecast", report))
}

async fn garden(
	State(state): State<AppState>,
	Query(params): Query<LocationParams>,
	Query(garden): Query<GardenParams>,
) -> Result<Response, ApiError> {
	let Some(location) = params.location else {
		return Err(ApiError::invalid_request("location is required."));
	};
	let report = state.service.garden_weather(&location, garden.garden_plan_id).await?;

	Ok(success("Successfully retrieved garden weather", report))
}
