use axum::{
	Json, Router,
	extract::{Path, Query, State},
	response::Response,
	routing::{get, post},
};
use uuid::Uuid;

use trellis_service::{PlantReminderInput, ReminderEmailRequest};

use crate::{
	routes::{ApiError, PageParams, created, success},
	state::AppState,
};

pub(crate) fn reminders_router() -> Router<AppState> {
	Router::new()
		.route("/", get(list).post(create))
		.route("/{id}", get(get_by_id).put(update).delete(delete))
		.route("/plant/{plant_id}", get(by_plant))
		.route("/garden-plan/{garden_plan_id}", get(by_plan))
}

pub(crate) fn email_router() -> Router<AppState> {
	Router::new().route("/send", post(send_email))
}

async fn list(
	State(state): State<AppState>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let reminders = state.service.list_plant_reminders(page.request()?).await?;

	Ok(success("Successfully retrieved reminders", reminders))
}

async fn get_by_id(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	let reminder = state.service.get_plant_reminder(id).await?;

	Ok(success("Successfully retrieved reminder", reminder))
}

async fn by_plant(
	State(state): State<AppState>,
	Path(plant_id): Path<Uuid>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let reminders = state
		.service
		.find_plant_reminders_by_plant(plant_id, page.request()?)
		.await?;

	Ok(success("Successfully retrieved reminders for plant", reminders))
}

async fn by_plan(
	State(state): State<AppState>,
	Path(garden_plan_id): Path<Uuid>,
	Query(page): Query<PageParams>,
) -> Result<Response, ApiError> {
	let reminders = state
		.service
		.find_plant_reminders_by_plan(garden_plan_id, page.request()?)
		.await?;

	Ok(success("Successfully retrieved reminders for garden plan", reminders))
}

async fn create(
	State(state): State<AppState>,
	Json(input): Json<PlantReminderInput>,
) -> Result<Response, ApiError> {
	let reminder = state.service.create_plant_reminder(input).await?;

	Ok(created("Reminder created successfully", reminder))
}

async fn update(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
	Json(input): Json<PlantReminderInput>,
) -> Result<Response, ApiError> {
	let reminder = state.service.update_plant_reminder(id, input).await?;

	Ok(success("Reminder updated successfully", reminder))
}

async fn delete(
	State(state): State<AppState>,
	Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
	state.service.delete_plant_reminder(id).await?;

	Ok(success("Reminder deleted successfully", ()))
}

async fn send_email(
	State(state): State<AppState>,
	Json(request): Json<ReminderEmailRequest>,
) -> Result<Response, ApiError> {
	let sent = state.service.send_reminder_email(request).await?;

	Ok(success("Reminder email sent successfully", sent))
}
