use axum::{Json, Router, extract::State, response::Response, routing::post};

use trellis_service::RecommendationRequest;

use crate::{
	routes::{ApiError, success},
	state::AppState,
};

pub(crate) fn router() -> Router<AppState> {
	Router::new().route("/", post(recommend))
}

/// Provider failures come back as `success: false` in the body with HTTP
/// 200; the envelope is an error only for malformed requests.
async fn recommend(
	State(state): State<AppState>,
	Json(request): Json<RecommendationRequest>,
) -> Result<Response, ApiError> {
	let response = state.service.plant_recommendations(request).await?;

	Ok(success("Plant recommendations generated", response))
}
