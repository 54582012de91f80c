use axum::{
	Json, Router,
	extract::{Path, Query, State},
	response::Response,
	routing::get,
};
use serde::Deserialize;
use uuid::Uuid;

use trellis_service::{ProfileInput, ProfileSearchRequest};

use crate::{
	routes::{ApiError, PageParams, created, success},
	state::AppState,
};

pub(crate) fn router() -> Router<AppState> {
	Router::new()
		.route("/", get(list).post(create))
		.route("/{id}", get(get_by_id).put(update).delete(delete))
		.route("/filter/full-name", get(by_full_name))
		.route("/search", get(search))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
	full_name: Option<String>,
	query: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ValueParams {
	value: String,
}

async fn list(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let profiles = state.service.list_profiles(page.request()?).await?;

	Ok(success("Successfully retrieved profiles", profiles))
}

async fn get_by_id(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	let profile = state.service.get_profile(id).await?;

	Ok(success("Successfully retrieved profile", profile))
}

async fn by_full_name(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Query(params): Query<ValueParams>,
) -> Result<Response, ApiError> {
	let profiles = state
		.service
		.find_profiles_by_full_name(&params.value, page.request()?)
		.await?;

	Ok(success("Successfully retrieved profiles by name", profiles))
}

async fn create(
	State(state): State<AppState>,
	Json(input): Json<ProfileInput>,
) -> Result<Response, ApiError> {
	let profile = state.service.create_profile(input).await?;

	Ok(created("Profile created successfully", profile))
}

async fn update(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(input): Json<ProfileInput>,
) -> Result<Response, ApiError> {
	let profile = state.service.update_profile(id, input).await?;

	Ok(success("Profile updated successfully", profile))
}

async fn delete(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	state.service.delete_profile(id).await?;

	Ok(success("Profile deleted successfully", ()))
}

async fn search(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
	Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
	let request =
		ProfileSearchRequest { full_name: params.full_name, query: params.query };
	let profiles = state.service.search_profiles_with_relevance(request, page.request()?).await?;

	Ok(success("Successfully searched profiles", profiles))
}
