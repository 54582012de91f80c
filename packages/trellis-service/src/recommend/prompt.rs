use trellis_domain::Season;

pub(crate) struct PromptArgs<'a> {
	pub(crate) garden_type: &'a str,
	pub(crate) location: &'a str,
	pub(crate) season: Season,
	pub(crate) experience: &'a str,
	pub(crate) time_commitment: &'a str,
	pub(crate) harvest_goals: &'a [String],
	pub(crate) existing_plants: &'a [String],
	pub(crate) message: &'a str,
}

pub(crate) fn system_prompt(season: Season) -> String {
	format!(
		"You are a knowledgeable and warm gardening assistant. Recommend plants as a JSON \
		 array of objects with these fields:\n\
		 - name: String - the plant's common name\n\
		 - type: String - vegetable, herb, flower, fruit, or shrub\n\
		 - description: String - one or two friendly sentences\n\
		 - sunlight_requirements: String\n\
		 - watering_frequency: String\n\
		 - seasonal_tips: String - tips specific to the current season ({season})\n\
		 - companion_plants: Array of strings\n\
		 - personal_note: String - an encouraging note for this gardener\n\
		 - difficulty: String - easy, moderate, or challenging\n\
		 - image_url: String - leave as an empty string\n\
		 CRITICALLY IMPORTANT: Return ONLY valid, parseable JSON. No markdown, no prose \
		 outside the array.",
		season = season.as_str(),
	)
}

pub(crate) fn user_prompt(args: &PromptArgs<'_>) -> String {
	format!(
		"Garden information:\n\
		 - Type: {garden_type}\n\
		 - Location: {location}\n\
		 - Current season: {season}\n\
		 - Gardening experience: {experience}\n\
		 - Time commitment: {time_commitment}\n\
		 - Harvest goals: {harvest_goals}\n\
		 - Existing plants: {existing_plants}\n\n\
		 User query: {message}\n\n\
		 Please provide 3-5 personalized plant recommendations that suit this garden and \
		 season.",
		garden_type = args.garden_type,
		location = args.location,
		season = args.season.as_str(),
		experience = args.experience,
		time_commitment = args.time_commitment,
		harvest_goals = join_or(args.harvest_goals, "general gardening"),
		existing_plants = join_or(args.existing_plants, "None yet"),
		message = args.message,
	)
}

fn join_or(values: &[String], fallback: &str) -> String {
	if values.is_empty() { fallback.to_string() } else { values.join(", ") }
}

#[cfg(test)]
mod tests {
	use trellis_domain::Season;

	use super::{PromptArgs, system_prompt, user_prompt};

	#[test]
	fn system_prompt_names_the_season() {
		let prompt = system_prompt(Season::Autumn);

		assert!(prompt.contains("(autumn)"));
		assert!(prompt.contains("ONLY valid, parseable JSON"));
	}

	#[test]
	fn user_prompt_fills_defaults_for_empty_lists() {
		let prompt = user_prompt(&PromptArgs {
			garden_type: "balcony",
			location: "Oslo",
			season: Season::Spring,
			experience: "beginner",
			time_commitment: "moderate",
			harvest_goals: &[],
			existing_plants: &[],
			message: "Recommend plants",
		});

		assert!(prompt.contains("- Type: balcony"));
		assert!(prompt.contains("- Harvest goals: general gardening"));
		assert!(prompt.contains("- Existing plants: None yet"));
	}

	#[test]
	fn user_prompt_joins_supplied_lists() {
		let goals = vec!["herbs".to_string(), "salads".to_string()];
		let existing = vec!["Mint".to_string()];
		let prompt = user_prompt(&PromptArgs {
			garden_type: "allotment",
			location: "Sydney, Australia",
			season: Season::Winter,
			experience: "expert",
			time_commitment: "high",
			harvest_goals: &goals,
			existing_plants: &existing,
			message: "What next?",
		});

		assert!(prompt.contains("herbs, salads"));
		assert!(prompt.contains("- Existing plants: Mint"));
		assert!(prompt.contains("- Current season: winter"));
	}
}
