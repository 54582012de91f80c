pub mod prompt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use trellis_domain::season_for;

use crate::{Result, TrellisService};

#[derive(Clone, Debug, Deserialize)]
pub struct RecommendationRequest {
	pub garden_type: Option<String>,
	pub location: Option<String>,
	pub existing_plants: Option<Vec<String>>,
	pub message: Option<String>,
	pub user_preferences: Option<UserPreferences>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct UserPreferences {
	pub experience: Option<String>,
	pub time_commitment: Option<String>,
	pub harvest_goals: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantRecommendation {
	pub name: String,
	#[serde(rename = "type")]
	pub plant_type: Option<String>,
	pub description: Option<String>,
	pub sunlight_requirements: Option<String>,
	pub watering_frequency: Option<String>,
	pub seasonal_tips: Option<String>,
	pub companion_plants: Option<Vec<String>>,
	pub personal_note: Option<String>,
	pub difficulty: Option<String>,
	pub image_url: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RecommendationMeta {
	pub season: String,
	pub location: String,
	pub garden_type: String,
}

/// Provider failures surface here as `success: false` with an error summary
/// rather than as an HTTP error; the caller still gets a well-formed body.
#[derive(Clone, Debug, Serialize)]
pub struct RecommendationResponse {
	pub success: bool,
	pub recommendations: Vec<PlantRecommendation>,
	pub meta: Option<RecommendationMeta>,
	pub error: Option<String>,
}
impl RecommendationResponse {
	fn failure(error: String) -> Self {
		Self { success: false, recommendations: Vec::new(), meta: None, error: Some(error) }
	}
}

impl TrellisService {
	pub async fn plant_recommendations(
		&self,
		request: RecommendationRequest,
	) -> Result<RecommendationResponse> {
		let garden_type = non_blank_or(request.garden_type.as_deref(), "Any");
		let location = non_blank_or(request.location.as_deref(), "Any");
		let message = non_blank_or(request.message.as_deref(), "Recommend plants");
		let preferences = request.user_preferences.unwrap_or_default();
		let experience = non_blank_or(preferences.experience.as_deref(), "beginner");
		let time_commitment = non_blank_or(preferences.time_commitment.as_deref(), "moderate");
		let harvest_goals = preferences.harvest_goals.unwrap_or_default();
		let existing_plants = request.existing_plants.unwrap_or_default();
		let month = OffsetDateTime::now_utc().month() as u8;
		let season = season_for(Some(location), month);
		let messages = [
			serde_json::json!({
				"role": "system",
				"content": prompt::system_prompt(season),
			}),
			serde_json::json!({
				"role": "user",
				"content": prompt::user_prompt(&prompt::PromptArgs {
					garden_type,
					location,
					season,
					experience,
					time_commitment,
					harvest_goals: &harvest_goals,
					existing_plants: &existing_plants,
					message,
				}),
			}),
		];
		let content = match self
			.providers
			.completion
			.complete(&self.cfg.providers.completion, &messages)
			.await
		{
			Ok(content) => content,
			Err(err) => {
				tracing::warn!(error = %err, "Completion provider call failed.");

				return Ok(RecommendationResponse::failure(
					"Error calling the completion provider.".to_string(),
				));
			},
		};
		let mut recommendations = match extract_recommendations(&content) {
			Ok(recommendations) => recommendations,
			Err(err) => {
				tracing::warn!(error = %err, "Completion content was not parseable.");

				return Ok(RecommendationResponse::failure(
					"Error parsing recommendations.".to_string(),
				));
			},
		};

		for recommendation in &mut recommendations {
			if recommendation.image_url.as_deref().is_some_and(|url| !url.is_empty()) {
				continue;
			}

			match self
				.providers
				.image_search
				.search_photo(&self.cfg.providers.image_search, &recommendation.name)
				.await
			{
				Ok(url) => recommendation.image_url = url,
				Err(err) => {
					tracing::warn!(
						error = %err,
						plant = %recommendation.name,
						"Image lookup failed; leaving image_url empty."
					);
				},
			}
		}

		Ok(RecommendationResponse {
			success: true,
			recommendations,
			meta: Some(RecommendationMeta {
				season: season.as_str().to_string(),
				location: location.to_string(),
				garden_type: garden_type.to_string(),
			}),
			error: None,
		})
	}
}

fn non_blank_or<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
	match value.map(str::trim) {
		Some(value) if !value.is_empty() => value,
		_ => default,
	}
}

/// Pulls the JSON array of recommendations out of model output that may be
/// wrapped in code fences or prose, or that may be a single bare object.
fn extract_recommendations(content: &str) -> Result<Vec<PlantRecommendation>, serde_json::Error> {
	let mut cleaned = content.trim();

	if let Some(stripped) = cleaned.strip_prefix("```json") {
		cleaned = stripped;
	} else if let Some(stripped) = cleaned.strip_prefix("```") {
		cleaned = stripped;
	}
	if let Some(stripped) = cleaned.strip_suffix("```") {
		cleaned = stripped;
	}

	let cleaned = cleaned.trim();

	if cleaned.starts_with('[') {
		return serde_json::from_str(cleaned);
	}

	let array = Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("Array pattern must compile.");

	if let Some(found) = array.find(cleaned) {
		return serde_json::from_str(found.as_str());
	}
	if cleaned.starts_with('{') && cleaned.ends_with('}') {
		return serde_json::from_str(&format!("[{cleaned}]"));
	}

	serde_json::from_str(cleaned)
}

#[cfg(test)]
mod tests {
	use super::extract_recommendations;

	#[test]
	fn parses_a_bare_array() {
		let parsed = extract_recommendations(r#"[{"name":"Basil"},{"name":"Thyme"}]"#)
			.expect("parse failed");

		assert_eq!(parsed.len(), 2);
		assert_eq!(parsed[0].name, "Basil");
	}

	#[test]
	fn strips_code_fences() {
		let content = "```json\n[{\"name\":\"Mint\",\"difficulty\":\"easy\"}]\n```";
		let parsed = extract_recommendations(content).expect("parse failed");

		assert_eq!(parsed.len(), 1);
		assert_eq!(parsed[0].difficulty.as_deref(), Some("easy"));
	}

	#[test]
	fn finds_an_array_inside_prose() {
		let content = "Here are my picks: [{\"name\":\"Sage\"}] Happy planting!";
		let parsed = extract_recommendations(content).expect("parse failed");

		assert_eq!(parsed.len(), 1);
		assert_eq!(parsed[0].name, "Sage");
	}

	#[test]
	fn wraps_a_single_object() {
		let parsed = extract_recommendations(r#"{"name":"Rosemary"}"#).expect("parse failed");

		assert_eq!(parsed.len(), 1);
		assert_eq!(parsed[0].name, "Rosemary");
	}

	#[test]
	fn rejects_non_json_content() {
		assert!(extract_recommendations("I cannot help with that.").is_err());
	}

	#[test]
	fn unknown_fields_are_tolerated() {
		let parsed = extract_recommendations(r#"[{"name":"Dill","color":"green"}]"#)
			.expect("parse failed");

		assert_eq!(parsed[0].name, "Dill");
	}
}
