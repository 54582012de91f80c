pub fn render_schema() -> String {
	let init = include_str!("../../../sql/init.sql");

	expand_includes(init)
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"00_extensions.sql" => out.push_str(include_str!("../../../sql/00_extensions.sql")),
				"tables/001_library_plants.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_library_plants.sql")),
				"tables/002_garden_plans.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_garden_plans.sql")),
				"tables/003_plants.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_plants.sql")),
				"tables/004_profiles.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_profiles.sql")),
				"tables/005_garden_images.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_garden_images.sql")),
				"tables/006_image_comments.sql" =>
					out.push_str(include_str!("../../../sql/tables/006_image_comments.sql")),
				"tables/007_image_likes.sql" =>
					out.push_str(include_str!("../../../sql/tables/007_image_likes.sql")),
				"tables/008_plant_reminders.sql" =>
					out.push_str(include_str!("../../../sql/tables/008_plant_reminders.sql")),
				"tables/009_pests.sql" =>
					out.push_str(include_str!("../../../sql/tables/009_pests.sql")),
				"tables/010_plant_diseases.sql" =>
					out.push_str(include_str!("../../../sql/tables/010_plant_diseases.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expands_every_include() {
		let rendered = render_schema();

		assert!(!rendered.contains("\\ir "), "all includes must be expanded");
		assert!(rendered.contains("CREATE TABLE IF NOT EXISTS library_plants"));
		assert!(rendered.contains("CREATE TABLE IF NOT EXISTS image_likes"));
		assert!(rendered.contains("UNIQUE (image_id, user_id)"));
	}
}
