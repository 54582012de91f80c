use axum::{
	Json, Router,
	extract::{Path, Query, State},
	response::Response,
	routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use trellis_service::{GardenPlanInput, GardenPlanSearchRequest};

use crate::{
	routes::{ApiError, PageParams, created, success},
	state::AppState,
};

pub(crate) fn router() -> Router<AppState> {
	Router::new()
		.route("/", get(list).post(create))
		.route("/all", get(list_all))
		.route("/{id}", get(get_by_id).put(update).delete(delete))
		.route("/user/{user_id}", get(by_user))
		.route("/public", get(public_plans))
		.route("/search", get(search))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
	name: Option<String>,
	#[serde(rename = "type")]
	plan_type: Option<String>,
	location: Option<String>,
	query: Option<String>,
	user_id: Option<Uuid>,
	is_public: Option<bool>,
}

async fn list(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let plans = state.service.list_garden_plans(page.request()?).await?;

	Ok(success("Successfully retrieved garden plans", plans))
}

async fn list_all(State(state): State<AppState>) -> Result<Response, ApiError> {
	let plans = state.service.list_all_garden_plans().await?;

	Ok(success("Successfully retrieved all garden plans", plans))
}

async fn get_by_id(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	let plan = state.service.get_garden_plan(id).await?;

	Ok(success("Successfully retrieved garden plan", plan))
}

async fn by_user(
	State(state): State<AppState>,
	Path(user_id): Path<Uuid>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let plans = state.service.find_garden_plans_by_user(user_id, page.request()?).await?;

	Ok(success("Successfully retrieved garden plans for user", plans))
}

async fn public_plans(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let plans = state.service.find_public_garden_plans(page.request()?).await?;

	Ok(success("Successfully retrieved public garden plans", plans))
}

async fn create(
	State(state): State<AppState>,
	Json(input): Json<GardenPlanInput>,
) -> Result<Response, ApiError> {
	let plan = state.service.create_garden_plan(input).await?;

	Ok(created("Garden plan created successfully", plan))
}

async fn update(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(input): Json<GardenPlanInput>,
) -> Result<Response, ApiError> {
	let plan = state.service.update_garden_plan(id, input).await?;

	Ok(success("Garden plan updated successfully", plan))
}

async fn delete(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	state.service.delete_garden_plan(id).await?;

	Ok(success("Garden plan deleted successfully", ()))
}

async fn search(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
	let request = GardenPlanSearchRequest {
		name: params.name,
		plan_type: params.plan_type,
		location: params.location,
		query: params.query,
		user_id: params.user_id,
		is_public: params.is_public,
	};
	let plans = state
		.service
		.search_garden_plans_with_relevance(request, page.request()?)
		.await?;

	Ok(success("Successfully searched garden plans", plans))
}
