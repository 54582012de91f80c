use axum::{
	Router,
	extract::{Path, Query, State},
	response::Response,
	routing::get,
};
use serde::Deserialize;

use crate::{
	routes::{ApiError, PageParams, success},
	state::AppState,
};

pub(crate) fn pests_router() -> Router<AppState> {
	Router::new()
		.route("/", get(list_pests))
		.route("/{id}", get(get_pest))
		.route("/search", get(search_pests))
}

pub(crate) fn diseases_router() -> Router<AppState> {
	Router::new()
		.route("/", get(list_diseases))
		.route("/{id}", get(get_disease))
		.route("/search", get(search_diseases))
}

#[derive(Debug, Deserialize)]
struct QueryParams {
	query: Option<String>,
}

async fn list_pests(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let pests = state.service.list_pests(page.request()?).await?;

	Ok(success("Successfully retrieved pests", pests))
}

async fn get_pest(
	State(state): State<AppState>,
	Path(id): Path<i64>,
) -> Result<Response, ApiError> {
	let pest = state.service.get_pest(id).await?;

	Ok(success("Successfully retrieved pest", pest))
}

async fn search_pests(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
	let pests = state.service.search_pests(params.query.as_deref(), page.request()?).await?;

	Ok(success("Successfully searched pests", pests))
}

async fn list_diseases(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let diseases = state.service.list_plant_diseases(page.request()?).await?;

	Ok(success("Successfully retrieved plant diseases", diseases))
}

async fn get_disease(
	State(state): State<AppState>,
	Path(id): Path<i64>,
) -> Result<Response, ApiError> {
	let disease = state.service.get_plant_disease(id).await?;

	Ok(success("Successfully retrieved plant disease", disease))
}

async fn search_diseases(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Query(params): Query<QueryParams>,
) -> Result<Response, ApiError> {
	let diseases = state
		.service
		.search_plant_diseases(params.query.as_deref(), page.request()?)
		.await?;

	Ok(success("Successfully searched plant diseases", diseases))
}
