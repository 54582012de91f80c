use axum::{
	Json, Router,
	extract::{Path, Query, State},
	response::Response,
	routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use trellis_service::{PlantInput, PlantSearchRequest};

use crate::{
	routes::{ApiError, PageParams, created, success},
	state::AppState,
};

pub(crate) fn router() -> Router<AppState> {
	Router::new()
		.route("/", get(list).post(create))
		.route("/all", get(list_all))
		.route("/{id}", get(get_by_id).put(update).delete(delete))
		.route("/garden-plan/{garden_plan_id}", get(by_garden_plan))
		.route("/filter/type", get(by_type))
		.route("/search", get(search))
		.route("/search/advanced", get(search_advanced))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
	query: Option<String>,
	garden_plan_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
struct AdvancedParams {
	name: Option<String>,
	#[serde(rename = "type")]
	plant_type: Option<String>,
	watering_frequency: Option<String>,
	sunlight_requirements: Option<String>,
	query: Option<String>,
	garden_plan_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
struct ValueParams {
	value: String,
}

async fn list(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let plants = state.service.list_plants(page.request()?).await?;

	Ok(success("Successfully retrieved plants", plants))
}

async fn list_all(State(state): State<AppState>) -> Result<Response, ApiError> {
	let plants = state.service.list_all_plants().await?;

	Ok(success("Successfully retrieved all plants", plants))
}

async fn get_by_id(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	let plant = state.service.get_plant(id).await?;

	Ok(success("Successfully retrieved plant", plant))
}

async fn by_garden_plan(
	State(state): State<AppState>,
	Path(garden_plan_id): Path<Uuid>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let plants = state
		.service
		.find_plants_by_garden_plan(garden_plan_id, page.request()?)
		.await?;

	Ok(success("Successfully retrieved plants for garden plan", plants))
}

async fn by_type(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Query(params): Query<ValueParams>,
) -> Result<Response, ApiError> {
	let plants = state.service.find_plants_by_type(&params.value, page.request()?).await?;

	Ok(success("Successfully retrieved plants by type", plants))
}

async fn create(
	State(state): State<AppState>,
	Json(input): Json<PlantInput>,
) -> Result<Response, ApiError> {
	let plant = state.service.create_plant(input).await?;

	Ok(created("Plant created successfully", plant))
}

async fn update(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(input): Json<PlantInput>,
) -> Result<Response, ApiError> {
	let plant = state.service.update_plant(id, input).await?;

	Ok(success("Plant updated successfully", plant))
}

async fn delete(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	state.service.delete_plant(id).await?;

	Ok(success("Plant deleted successfully", ()))
}

async fn search(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
	let plants = state
		.service
		.search_plants(params.query.as_deref(), params.garden_plan_id, page.request()?)
		.await?;

	Ok(success("Successfully searched plants", plants))
}

async fn search_advanced(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Query(params): Query<AdvancedParams>,
) -> Result<Response, ApiError> {
	let request = PlantSearchRequest {
		name: params.name,
		plant_type: params.plant_type,
		watering_frequency: params.watering_frequency,
		sunlight_requirements: params.sunlight_requirements,
		query: params.query,
		garden_plan_id: params.garden_plan_id,
	};
	let plants = state.service.search_plants_with_relevance(request, page.request()?).await?;

	Ok(success("Successfully searched plants", plants))
}
