use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use trellis_domain::{LibrarySearchCriteria, Page, PageRequest};
use trellis_storage::{models::LibraryPlant, page};

use crate::{Error, Result, TrellisService, search};

/// Columns the plain free-text search ORs across.
const SEARCH_COLUMNS: &[&str] = &[
	"common_name",
	"other_name",
	"scientific_name",
	"short_description",
	"origin",
	"plant_type",
	"climate",
	"life_cycle",
	"watering_frequency",
	"soil_type",
	"sunlight_requirement",
	"ideal_place",
	"care_level",
];

const SELECT: &str = "SELECT * FROM library_plants WHERE TRUE";
const COUNT: &str = "SELECT count(*) FROM library_plants WHERE TRUE";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LibraryPlantDto {
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
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<LibraryPlant> for LibraryPlantDto {
	fn from(row: LibraryPlant) -> Self {
		Self {
			id: row.id,
			common_name: row.common_name,
			other_name: row.other_name,
			scientific_name: row.scientific_name,
			short_description: row.short_description,
			origin: row.origin,
			plant_type: row.plant_type,
			climate: row.climate,
			life_cycle: row.life_cycle,
			watering_frequency: row.watering_frequency,
			soil_type: row.soil_type,
			size: row.size,
			sunlight_requirement: row.sunlight_requirement,
			growth_rate: row.growth_rate,
			ideal_place: row.ideal_place,
			care_level: row.care_level,
			image_url: row.image_url,
			best_planting_season: row.best_planting_season,
			gardening_tips: row.gardening_tips,
			pruning_guide: row.pruning_guide,
			seed_depth: row.seed_depth,
			germination_time: row.germination_time,
			time_to_harvest: row.time_to_harvest,
			flower: row.flower,
			fruit: row.fruit,
			medicinal: row.medicinal,
			temperature_min: row.temperature_min,
			temperature_max: row.temperature_max,
			common_pests: row.common_pests,
			common_diseases: row.common_diseases,
			companion_plants: row.companion_plants,
			avoid_planting_with: row.avoid_planting_with,
			pest_disease_prevention_tips: row.pest_disease_prevention_tips,
			cool_facts: row.cool_facts,
			edible_parts: row.edible_parts,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}

/// Caller-supplied plant fields for create and update. Ids and timestamps
/// are server-assigned.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LibraryPlantInput {
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
}

/// Binds every caller-supplied field in table-column order. The insert and
/// update statements below list their columns in exactly this order.
macro_rules! bind_plant_input {
	($query:expr, $input:expr) => {
		$query
			.bind($input.common_name.as_deref())
			.bind($input.other_name.as_deref())
			.bind($input.scientific_name.as_deref())
			.bind($input.short_description.as_deref())
			.bind($input.origin.as_deref())
			.bind($input.plant_type.as_deref())
			.bind($input.climate.as_deref())
			.bind($input.life_cycle.as_deref())
			.bind($input.watering_frequency.as_deref())
			.bind($input.soil_type.as_deref())
			.bind($input.size.as_deref())
			.bind($input.sunlight_requirement.as_deref())
			.bind($input.growth_rate.as_deref())
			.bind($input.ideal_place.as_deref())
			.bind($input.care_level.as_deref())
			.bind($input.image_url.as_deref())
			.bind($input.best_planting_season.as_deref())
			.bind($input.gardening_tips.as_deref())
			.bind($input.pruning_guide.as_deref())
			.bind($input.seed_depth)
			.bind($input.germination_time)
			.bind($input.time_to_harvest)
			.bind($input.flower)
			.bind($input.fruit)
			.bind($input.medicinal)
			.bind($input.temperature_min)
			.bind($input.temperature_max)
			.bind($input.common_pests.as_deref())
			.bind($input.common_diseases.as_deref())
			.bind($input.companion_plants.as_deref())
			.bind($input.avoid_planting_with.as_deref())
			.bind($input.pest_disease_prevention_tips.as_deref())
			.bind($input.cool_facts.as_deref())
			.bind($input.edible_parts.as_deref())
	};
}

fn sort_column(sort: Option<&str>) -> Result<&'static str> {
	match sort.unwrap_or("common_name") {
		"common_name" => Ok("common_name"),
		"scientific_name" => Ok("scientific_name"),
		"plant_type" => Ok("plant_type"),
		"care_level" => Ok("care_level"),
		"time_to_harvest" => Ok("time_to_harvest"),
		"created_at" => Ok("created_at"),
		"updated_at" => Ok("updated_at"),
		other => Err(Error::InvalidRequest {
			message: format!("Unknown sort column '{other}' for library plants."),
		}),
	}
}

impl TrellisService {
	pub async fn list_library_plants(
		&self,
		request: PageRequest,
	) -> Result<Page<LibraryPlantDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let page = page::fetch_page::<LibraryPlant>(
			&self.db.pool,
			QueryBuilder::new(SELECT),
			QueryBuilder::new(COUNT),
			&request,
			sort,
		)
		.await?;

		Ok(page.map(LibraryPlantDto::from))
	}

	pub async fn list_all_library_plants(&self) -> Result<Vec<LibraryPlantDto>> {
		let rows: Vec<LibraryPlant> =
			sqlx::query_as("SELECT * FROM library_plants ORDER BY common_name ASC")
				.fetch_all(&self.db.pool)
				.await?;

		Ok(rows.into_iter().map(LibraryPlantDto::from).collect())
	}

	pub async fn get_library_plant(&self, id: Uuid) -> Result<LibraryPlantDto> {
		let row: Option<LibraryPlant> =
			sqlx::query_as("SELECT * FROM library_plants WHERE id = $1")
				.bind(id)
				.fetch_optional(&self.db.pool)
				.await?;

		row.map(LibraryPlantDto::from)
			.ok_or_else(|| Error::NotFound { message: "Plant not found.".to_string() })
	}

	pub async fn create_library_plant(
		&self,
		input: LibraryPlantInput,
	) -> Result<LibraryPlantDto> {
		let now = OffsetDateTime::now_utc();
		let query = sqlx::query_as(
			"\
INSERT INTO library_plants (
	common_name, other_name, scientific_name, short_description, origin,
	plant_type, climate, life_cycle, watering_frequency, soil_type, size,
	sunlight_requirement, growth_rate, ideal_place, care_level, image_url,
	best_planting_season, gardening_tips, pruning_guide, seed_depth,
	germination_time, time_to_harvest, flower, fruit, medicinal,
	temperature_min, temperature_max, common_pests, common_diseases,
	companion_plants, avoid_planting_with, pest_disease_prevention_tips,
	cool_facts, edible_parts, created_at, updated_at
)
VALUES (
	$1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
	$17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30,
	$31, $32, $33, $34, $35, $36
)
RETURNING *",
		);
		let row: LibraryPlant = bind_plant_input!(query, input)
			.bind(now)
			.bind(now)
			.fetch_one(&self.db.pool)
			.await?;

		Ok(row.into())
	}

	pub async fn update_library_plant(
		&self,
		id: Uuid,
		input: LibraryPlantInput,
	) -> Result<LibraryPlantDto> {
		let now = OffsetDateTime::now_utc();
		let query = sqlx::query_as(
			"\
UPDATE library_plants
SET
	common_name = $1, other_name = $2, scientific_name = $3,
	short_description = $4, origin = $5, plant_type = $6, climate = $7,
	life_cycle = $8, watering_frequency = $9, soil_type = $10, size = $11,
	sunlight_requirement = $12, growth_rate = $13, ideal_place = $14,
	care_level = $15, image_url = $16, best_planting_season = $17,
	gardening_tips = $18, pruning_guide = $19, seed_depth = $20,
	germination_time = $21, time_to_harvest = $22, flower = $23, fruit = $24,
	medicinal = $25, temperature_min = $26, temperature_max = $27,
	common_pests = $28, common_diseases = $29, companion_plants = $30,
	avoid_planting_with = $31, pest_disease_prevention_tips = $32,
	cool_facts = $33, edible_parts = $34, updated_at = $35
WHERE id = $36
RETURNING *",
		);
		let row: Option<LibraryPlant> = bind_plant_input!(query, input)
			.bind(now)
			.bind(id)
			.fetch_optional(&self.db.pool)
			.await?;

		row.map(LibraryPlantDto::from)
			.ok_or_else(|| Error::NotFound { message: "Plant not found.".to_string() })
	}

	/// Deleting an absent plant is a no-op, not an error.
	pub async fn delete_library_plant(&self, id: Uuid) -> Result<()> {
		sqlx::query("DELETE FROM library_plants WHERE id = $1")
			.bind(id)
			.execute(&self.db.pool)
			.await?;

		Ok(())
	}

	/// Plain search: one query term ORed across the fixed column list. A
	/// blank query lists everything.
	pub async fn search_library_plants(
		&self,
		query: Option<&str>,
		request: PageRequest,
	) -> Result<Page<LibraryPlantDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		if let Some(query) = query {
			search::push_contains_any(&mut select, SEARCH_COLUMNS, query);
			search::push_contains_any(&mut count, SEARCH_COLUMNS, query);
		}

		let page =
			page::fetch_page::<LibraryPlant>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(LibraryPlantDto::from))
	}

	/// Advanced search: every set criteria field must hold simultaneously
	/// (strict AND), unlike the plain search's OR.
	pub async fn search_library_plants_advanced(
		&self,
		criteria: LibrarySearchCriteria,
		request: PageRequest,
	) -> Result<Page<LibraryPlantDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let criteria = criteria.normalized();
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		search::filter::push_criteria(&mut select, &criteria);
		search::filter::push_criteria(&mut count, &criteria);

		let page =
			page::fetch_page::<LibraryPlant>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(LibraryPlantDto::from))
	}

	pub async fn find_library_plants_by_type(
		&self,
		plant_type: &str,
		request: PageRequest,
	) -> Result<Page<LibraryPlantDto>> {
		self.find_library_plants_by_column("plant_type", plant_type, request).await
	}

	pub async fn find_library_plants_by_life_cycle(
		&self,
		life_cycle: &str,
		request: PageRequest,
	) -> Result<Page<LibraryPlantDto>> {
		self.find_library_plants_by_column("life_cycle", life_cycle, request).await
	}

	pub async fn find_library_plants_by_medicinal(
		&self,
		medicinal: bool,
		request: PageRequest,
	) -> Result<Page<LibraryPlantDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		for builder in [&mut select, &mut count] {
			builder.push(" AND medicinal = ");
			builder.push_bind(medicinal);
		}

		let page =
			page::fetch_page::<LibraryPlant>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(LibraryPlantDto::from))
	}

	async fn find_library_plants_by_column(
		&self,
		column: &str,
		value: &str,
		request: PageRequest,
	) -> Result<Page<LibraryPlantDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		search::push_contains_any(&mut select, &[column], value);
		search::push_contains_any(&mut count, &[column], value);

		let page =
			page::fetch_page::<LibraryPlant>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(LibraryPlantDto::from))
	}
}
