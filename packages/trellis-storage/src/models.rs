use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct LibraryPlant {
	pub id: Uuid,
	pub common_name: Option<String>,
	pub other_name: Option<String>,
	pub scientific_name: Option<String>,
	pub short_description: Option<String>,
	pub origin: Option<String>,
	pub plant_type: Option<String>,
	pub climate: Option<String>,
	pub life_cycle: Option<String>,
	pub watering_frequency: Option<String>,
	pub soil_type: Option<String>,
	pub size: Option<String>,
	pub sunlight_requirement: Option<String>,
	pub growth_rate: Option<String>,
	pub ideal_place: Option<String>,
	pub care_level: Option<String>,
	pub image_url: Option<String>,
	pub best_planting_season: Option<String>,
	pub gardening_tips: Option<String>,
	pub pruning_guide: Option<String>,
	pub seed_depth: Option<f64>,
	pub germination_time: Option<f64>,
	pub time_to_harvest: Option<f64>,
	pub flower: Option<bool>,
	pub fruit: Option<bool>,
	pub medicinal: Option<bool>,
	pub temperature_min: Option<f64>,
	pub temperature_max: Option<f64>,
	pub common_pests: Option<Vec<String>>,
	pub common_diseases: Option<Vec<String>>,
	pub companion_plants: Option<Vec<String>>,
	pub avoid_planting_with: Option<Vec<String>>,
	pub pest_disease_prevention_tips: Option<Vec<String>>,
	pub cool_facts: Option<Vec<String>>,
	pub edible_parts: Option<Vec<String>>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct Plant {
	pub id: Uuid,
	pub garden_plan_id: Uuid,
	pub name: String,
	pub r#type: String,
	pub description: Option<String>,
	pub watering_frequency: Option<String>,
	pub sunlight_requirements: Option<String>,
	pub position_x: Option<i32>,
	pub position_y: Option<i32>,
	pub image_url: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct GardenPlan {
	pub id: Uuid,
	pub user_id: Uuid,
	pub name: String,
	pub r#type: String,
	pub description: Option<String>,
	pub location: Option<String>,
	pub thumbnail_url: Option<String>,
	pub is_public: bool,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct Profile {
	pub id: Uuid,
	pub full_name: Option<String>,
	pub avatar_url: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct GardenImage {
	pub id: Uuid,
	pub garden_plan_id: Option<Uuid>,
	pub image_url: String,
	pub title: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ImageComment {
	pub id: Uuid,
	pub image_id: Uuid,
	pub user_id: Uuid,
	pub comment: String,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ImageLike {
	pub id: Uuid,
	pub image_id: Uuid,
	pub user_id: Uuid,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PlantReminder {
	pub id: Uuid,
	pub plant_id: Uuid,
	pub garden_plan_id: Uuid,
	pub reminder_type: String,
	pub reminder_date: Date,
	pub notes: Option<String>,
	pub is_completed: bool,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct Pest {
	pub id: i64,
	pub common_name: String,
	pub scientific_name: Option<String>,
	pub description: Option<String>,
	pub damage_symptoms: Option<String>,
	pub life_cycle: Option<String>,
	pub season_active: Option<String>,
	pub organic_control: Option<String>,
	pub chemical_control: Option<String>,
	pub prevention_tips: Option<String>,
	pub image_url: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, sqlx::FromRow)]
pub struct PlantDisease {
	pub id: i64,
	pub common_name: String,
	pub scientific_name: Option<String>,
	pub description: Option<String>,
	pub symptoms: Option<String>,
	pub cause: Option<String>,
	pub season_active: Option<String>,
	pub organic_control: Option<String>,
	pub chemical_control: Option<String>,
	pub prevention_tips: Option<String>,
	pub image_url: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
