mod garden_plans;
mod images;
mod library;
mod pests_diseases;
mod plants;
mod profiles;
mod recommend;
mod reminders;
mod weather;

use axum::{
	Json, Router,
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::{Deserialize, Serialize};

use trellis_domain::{PageRequest, SortDirection};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.nest("/api/library-plants", library::router())
		.nest("/api/plants", plants::router())
		.nest("/api/garden-plans", garden_plans::router())
		.nest("/api/profiles", profiles::router())
		.nest("/api/garden-images", images::images_router())
		.nest("/api/image-comments", images::comments_router())
		.nest("/api/image-likes", images::likes_router())
		.nest("/api/plant-reminders", reminders::reminders_router())
		.nest("/api/reminders", reminders::email_router())
		.nest("/api/pests", pests_diseases::pests_router())
		.nest("/api/plant-diseases", pests_diseases::diseases_router())
		.nest("/api/weather", weather::router())
		.nest("/api/plant-recommendations", recommend::router())
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

/// Uniform success envelope: `{status, message, data}`.
#[derive(Debug, Serialize)]
struct ApiResponse<T> {
	status: u16,
	message: String,
	data: T,
}

pub(crate) fn success<T: Serialize>(message: &str, data: T) -> Response {
	let body = ApiResponse { status: StatusCode::OK.as_u16(), message: message.to_string(), data };

	(StatusCode::OK, Json(body)).into_response()
}

pub(crate) fn created<T: Serialize>(message: &str, data: T) -> Response {
	let body =
		ApiResponse { status: StatusCode::CREATED.as_u16(), message: message.to_string(), data };

	(StatusCode::CREATED, Json(body)).into_response()
}

/// Uniform error envelope: `{status, message, code}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
	status: u16,
	message: String,
	code: String,
}

#[derive(Debug)]
pub(crate) struct ApiError {
	status: StatusCode,
	code: &'static str,
	message: String,
}
impl ApiError {
	pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
		Self { status: StatusCode::BAD_REQUEST, code: "invalid_request", message: message.into() }
	}
}

impl From<trellis_service::Error> for ApiError {
	fn from(err: trellis_service::Error) -> Self {
		match err {
			trellis_service::Error::InvalidRequest { message } => Self {
				status: StatusCode::BAD_REQUEST,
				code: "invalid_request",
				message,
			},
			trellis_service::Error::NotFound { message } => Self {
				status: StatusCode::NOT_FOUND,
				code: "not_found",
				message,
			},
			trellis_service::Error::Conflict { message } => Self {
				status: StatusCode::CONFLICT,
				code: "conflict",
				message,
			},
			trellis_service::Error::Provider { message } => {
				tracing::error!(error = %message, "Provider call failed.");

				Self {
					status: StatusCode::INTERNAL_SERVER_ERROR,
					code: "provider_error",
					message: "An upstream provider request failed.".to_string(),
				}
			},
			trellis_service::Error::Storage { message } => {
				tracing::error!(error = %message, "Storage call failed.");

				Self {
					status: StatusCode::INTERNAL_SERVER_ERROR,
					code: "internal_error",
					message: "An unexpected error occurred.".to_string(),
				}
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody {
			status: self.status.as_u16(),
			message: self.message,
			code: self.code.to_string(),
		};

		(self.status, Json(body)).into_response()
	}
}

/// Shared pagination query parameters. Extracted alongside each endpoint's
/// own filter parameters.
#[derive(Debug, Deserialize)]
pub(crate) struct PageParams {
	#[serde(default)]
	page: u32,
	#[serde(default = "default_size")]
	size: u32,
	sort: Option<String>,
	direction: Option<String>,
}
impl PageParams {
	pub(crate) fn request(&self) -> Result<PageRequest, ApiError> {
		let Some(direction) = SortDirection::parse(self.direction.as_deref()) else {
			return Err(ApiError::invalid_request("direction must be ASC or DESC."));
		};

		if self.size == 0 {
			return Err(ApiError::invalid_request("size must be greater than zero."));
		}

		Ok(PageRequest {
			page: self.page,
			size: self.size,
			sort: self.sort.clone(),
			direction,
		})
	}
}

fn default_size() -> u32 {
	10
}
