use axum::{
	Json,
	Router,
	extract::{Path, Query, State},
	response::Response,
	routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use trellis_domain::LibrarySearchCriteria;
use trellis_service::LibraryPlantInput;

use crate::{
	routes::{ApiError, PageParams, created, success},
	state::AppState,
};

pub(crate) fn router() -> Router<AppState> {
	Router::new()
		.route("/", get(list).post(create))
		.route("/all", get(list_all))
		.route("/{id}", get(get_by_id).put(update).delete(delete))
		.route("/search", get(search))
		.route("/search/advanced", get(search_advanced))
		.route("/filter/plant-type", get(filter_plant_type))
		.route("/filter/life-cycle", get(filter_life_cycle))
		.route("/filter/medicinal", get(filter_medicinal))
}

#[derive(Debug, Deserialize)]
struct QueryParams {
	query: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValueParams {
	value: String,
}

#[derive(Debug, Deserialize)]
struct MedicinalParams {
	value: bool,
}

#[derive(Debug, Deserialize)]
struct AdvancedParams {
	common_name: Option<String>,
	other_name: Option<String>,
	scientific_name: Option<String>,
	origin: Option<String>,
	plant_type: Option<String>,
	climate: Option<String>,
	life_cycle: Option<String>,
	watering_frequency: Option<String>,
	soil_type: Option<String>,
	size: Option<String>,
	sunlight_requirement: Option<String>,
	growth_rate: Option<String>,
	ideal_place: Option<String>,
	care_level: Option<String>,
	best_planting_season: Option<String>,
	time_to_harvest: Option<f64>,
	flower: Option<bool>,
	fruit: Option<bool>,
	medicinal: Option<bool>,
}
impl From<AdvancedParams> for LibrarySearchCriteria {
	fn from(params: AdvancedParams) -> Self {
		Self {
			common_name: params.common_name,
			other_name: params.other_name,
			scientific_name: params.scientific_name,
			origin: params.origin,
			plant_type: params.plant_type,
			climate: params.climate,
			life_cycle: params.life_cycle,
			watering_frequency: params.watering_frequency,
			soil_type: params.soil_type,
			size: params.size,
			sunlight_requirement: params.sunlight_requirement,
			growth_rate: params.growth_rate,
			ideal_place: params.ideal_place,
			care_level: params.care_level,
			best_planting_season: params.best_planting_season,
			time_to_harvest: params.time_to_harvest,
			flower: params.flower,
			fruit: params.fruit,
			medicinal: params.medicinal,
		}
	}
}

async fn list(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let plants = state.service.list_library_plants(page.request()?).await?;

	Ok(success("Successfully retrieved plants", plants))
}

async fn list_all(State(state): State<AppState>) -> Result<Response, ApiError> {
	let plants = state.service.list_all_library_plants().await?;

	Ok(success("Successfully retrieved all plants", plants))
}

async fn get_by_id(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	let plant = state.service.get_library_plant(id).await?;

	Ok(success("Successfully retrieved plant", plant))
}

async fn create(
	State(state): State<AppState>,
	Json(input): Json<LibraryPlantInput>,
) -> Result<Response, ApiError> {
	let plant = state.service.create_library_plant(input).await?;

	Ok(created("Plant created successfully", plant))
}

async fn update(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(input): Json<LibraryPlantInput>,
) -> Result<Response, ApiError> {
	let plant = state.service.update_library_plant(id, input).await?;

	Ok(success("Plant updated successfully", plant))
}

async fn delete(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	state.service.delete_library_plant(id).await?;

	Ok(success("Plant deleted successfully", ()))
}

async fn search(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
	let plants = state
		.service
		.search_library_plants(params.query.as_deref(), page.request()?)
		.await?;

	Ok(success("Successfully searched plants", plants))
}

async fn search_advanced(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Query(params): Query<AdvancedParams>,
) -> Result<Response, ApiError> {
	let plants = state
		.service
		.search_library_plants_advanced(params.into(), page.request()?)
		.await?;

	Ok(success("Successfully searched plants", plants))
}

async fn filter_plant_type(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Query(params): Query<ValueParams>,
) -> Result<Response, ApiError> {
	let plants = state
		.service
		.find_library_plants_by_type(&params.value, page.request()?)
		.await?;

	Ok(success("Successfully retrieved plants by type", plants))
}

async fn filter_life_cycle(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Query(params): Query<ValueParams>,
) -> Result<Response, ApiError> {
	let plants = state
		.service
		.find_library_plants_by_life_cycle(&params.value, page.request()?)
		.await?;

	Ok(success("Successfully retrieved plants by life cycle", plants))
}

async fn filter_medicinal(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Query(params): Query<MedicinalParams>,
) -> Result<Response, ApiError> {
	let plants = state
		.service
		.find_library_plants_by_medicinal(params.value, page.request()?)
		.await?;

	Ok(success("Successfully retrieved plants by medicinal use", plants))
}
