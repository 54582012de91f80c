use axum::{
	Json, Router,
	extract::{Path, Query, State},
	response::Response,
	routing::{get, post},
};
use uuid::Uuid;

use trellis_service::{GardenImageInput, ImageCommentInput, LikeRequest};

use crate::{
	routes::{ApiError, PageParams, created, success},
	state::AppState,
};

pub(crate) fn images_router() -> Router<AppState> {
	Router::new()
		.route("/", get(list_images).post(create_image))
		.route("/{id}", get(get_image).put(update_image).delete(delete_image))
		.route("/garden-plan/{garden_plan_id}", get(images_by_plan))
}

pub(crate) fn comments_router() -> Router<AppState> {
	Router::new()
		.route("/", get(list_comments).post(create_comment))
		.route("/{id}", get(get_comment).delete(delete_comment))
		.route("/image/{image_id}", get(comments_by_image))
}

pub(crate) fn likes_router() -> Router<AppState> {
	Router::new()
		.route("/", post(create_like))
		.route("/toggle", post(toggle_like))
		.route("/image/{image_id}", get(likes_by_image))
		.route("/image/{image_id}/count", get(count_likes))
		.route(
			"/image/{image_id}/user/{user_id}",
			get(has_user_liked).delete(unlike),
		)
}

async fn list_images(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let images = state.service.list_garden_images(page.request()?).await?;

	Ok(success("Successfully retrieved garden images", images))
}

async fn get_image(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	let image = state.service.get_garden_image(id).await?;

	Ok(success("Successfully retrieved garden image", image))
}

async fn images_by_plan(
	State(state): State<AppState>,
	Path(garden_plan_id): Path<Uuid>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let images = state
		.service
		.find_garden_images_by_plan(garden_plan_id, page.request()?)
		.await?;

	Ok(success("Successfully retrieved garden images for plan", images))
}

async fn create_image(
	State(state): State<AppState>,
	Json(input): Json<GardenImageInput>,
) -> Result<Response, ApiError> {
	let image = state.service.create_garden_image(input).await?;

	Ok(created("Garden image created successfully", image))
}

async fn update_image(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(input): Json<GardenImageInput>,
) -> Result<Response, ApiError> {
	let image = state.service.update_garden_image(id, input).await?;

	Ok(success("Garden image updated successfully", image))
}

async fn delete_image(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	state.service.delete_garden_image(id).await?;

	Ok(success("Garden image deleted successfully", ()))
}

async fn list_comments(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let comments = state.service.list_image_comments(page.request()?).await?;

	Ok(success("Successfully retrieved comments", comments))
}

async fn get_comment(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	let comment = state.service.get_image_comment(id).await?;

	Ok(success("Successfully retrieved comment", comment))
}

async fn comments_by_image(
	State(state): State<AppState>,
	Path(image_id): Path<Uuid>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let comments = state
		.service
		.find_image_comments_by_image(image_id, page.request()?)
		.await?;

	Ok(success("Successfully retrieved comments for image", comments))
}

async fn create_comment(
	State(state): State<AppState>,
	Json(input): Json<ImageCommentInput>,
) -> Result<Response, ApiError> {
	let comment = state.service.create_image_comment(input).await?;

	Ok(created("Comment created successfully", comment))
}

async fn delete_comment(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	state.service.delete_image_comment(id).await?;

	Ok(success("Comment deleted successfully", ()))
}

async fn likes_by_image(
	State(state): State<AppState>,
	Path(image_id): Path<Uuid>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let likes = state.service.find_image_likes_by_image(image_id, page.request()?).await?;

	Ok(success("Successfully retrieved likes for image", likes))
}

async fn count_likes(
	State(state): State<AppState>,
	Path(image_id): Path<Uuid>,
) -> Result<Response, ApiError> {
	let count = state.service.count_image_likes(image_id).await?;

	Ok(success("Successfully counted likes", count))
}

async fn has_user_liked(
	State(state): State<AppState>,
	Path((image_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiError> {
	let status = state.service.has_user_liked_image(image_id, user_id).await?;

	Ok(success("Successfully checked like status", status))
}

/// Duplicate likes are a 409; use `/toggle` to flip state instead.
async fn create_like(
	State(state): State<AppState>,
	Json(request): Json<LikeRequest>,
) -> Result<Response, ApiError> {
	let like = state.service.create_image_like(request).await?;

	Ok(created("Image liked successfully", like))
}

async fn toggle_like(
	State(state): State<AppState>,
	Json(request): Json<LikeRequest>,
) -> Result<Response, ApiError> {
	let outcome = state.service.toggle_image_like(request).await?;

	Ok(success("Like toggled successfully", outcome))
}

/// Idempotent: a repeat unlike reports `removed: false` with HTTP 200.
async fn unlike(
	State(state): State<AppState>,
	Path((image_id, user_id)): Path<(Uuid, Uuid)>,
) -> Result<Response, ApiError> {
	let outcome = state.service.unlike_image(image_id, user_id).await?;

	Ok(success("Unlike processed successfully", outcome))
}
