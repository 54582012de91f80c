use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use trellis_domain::{Page, PageRequest};
use trellis_storage::{models::Plant, page};

use crate::{Error, Result, TrellisService, search};

const SEARCH_COLUMNS: &[&str] =
	&["name", "description", "type", "watering_frequency", "sunlight_requirements"];

const SELECT: &str = "SELECT * FROM plants WHERE TRUE";
const COUNT: &str = "SELECT count(*) FROM plants WHERE TRUE";

/// Relevance-ordered search. Exact, prefix, and substring matches on the
/// name score highest, then type, then the care fields; a general-query hit
/// adds a flat bonus. Rows that match none of the supplied terms are
/// excluded by the WHERE clause before scoring.
const RELEVANCE_SELECT: &str = "\
SELECT p.*,
	CASE
		WHEN lower(p.name) = lower($1::text) THEN 100
		WHEN p.name ILIKE $1::text || '%' THEN 80
		WHEN p.name ILIKE '%' || $1::text || '%' THEN 60
		ELSE 0
	END
	+ CASE
		WHEN lower(p.type) = lower($2::text) THEN 50
		WHEN p.type ILIKE $2::text || '%' THEN 40
		WHEN p.type ILIKE '%' || $2::text || '%' THEN 30
		ELSE 0
	END
	+ CASE
		WHEN lower(p.watering_frequency) = lower($3::text) THEN 25
		WHEN p.watering_frequency ILIKE $3::text || '%' THEN 20
		WHEN p.watering_frequency ILIKE '%' || $3::text || '%' THEN 15
		ELSE 0
	END
	+ CASE
		WHEN lower(p.sunlight_requirements) = lower($4::text) THEN 25
		WHEN p.sunlight_requirements ILIKE $4::text || '%' THEN 20
		WHEN p.sunlight_requirements ILIKE '%' || $4::text || '%' THEN 15
		ELSE 0
	END
	+ CASE
		WHEN $5::text IS NOT NULL
			AND (p.name ILIKE '%' || $5 || '%'
				OR p.description ILIKE '%' || $5 || '%'
				OR p.type ILIKE '%' || $5 || '%'
				OR p.watering_frequency ILIKE '%' || $5 || '%'
				OR p.sunlight_requirements ILIKE '%' || $5 || '%')
			THEN 10
		ELSE 0
	END AS relevance_score
FROM plants p
WHERE ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%')
	AND ($2::text IS NULL OR p.type ILIKE '%' || $2 || '%')
	AND ($3::text IS NULL OR p.watering_frequency ILIKE '%' || $3 || '%')
	AND ($4::text IS NULL OR p.sunlight_requirements ILIKE '%' || $4 || '%')
	AND ($5::text IS NULL
		OR p.name ILIKE '%' || $5 || '%'
		OR p.description ILIKE '%' || $5 || '%'
		OR p.type ILIKE '%' || $5 || '%'
		OR p.watering_frequency ILIKE '%' || $5 || '%'
		OR p.sunlight_requirements ILIKE '%' || $5 || '%')
	AND ($6::uuid IS NULL OR p.garden_plan_id = $6)
ORDER BY relevance_score DESC
LIMIT $7 OFFSET $8";

const RELEVANCE_COUNT: &str = "\
SELECT count(*)
FROM plants p
WHERE ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%')
	AND ($2::text IS NULL OR p.type ILIKE '%' || $2 || '%')
	AND ($3::text IS NULL OR p.watering_frequency ILIKE '%' || $3 || '%')
	AND ($4::text IS NULL OR p.sunlight_requirements ILIKE '%' || $4 || '%')
	AND ($5::text IS NULL
		OR p.name ILIKE '%' || $5 || '%'
		OR p.description ILIKE '%' || $5 || '%'
		OR p.type ILIKE '%' || $5 || '%'
		OR p.watering_frequency ILIKE '%' || $5 || '%'
		OR p.sunlight_requirements ILIKE '%' || $5 || '%')
	AND ($6::uuid IS NULL OR p.garden_plan_id = $6)";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlantDto {
	pub id: Uuid,
	pub garden_plan_id: Uuid,
	pub name: String,
	#[serde(rename = "type")]
	pub plant_type: String,
	pub description: Option<String>,
	pub watering_frequency: Option<String>,
	pub sunlight_requirements: Option<String>,
	pub position_x: Option<i32>,
	pub position_y: Option<i32>,
	pub image_url: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Plant> for PlantDto {
	fn from(row: Plant) -> Self {
		Self {
			id: row.id,
			garden_plan_id: row.garden_plan_id,
			name: row.name,
			plant_type: row.r#type,
			description: row.description,
			watering_frequency: row.watering_frequency,
			sunlight_requirements: row.sunlight_requirements,
			position_x: row.position_x,
			position_y: row.position_y,
			image_url: row.image_url,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlantInput {
	pub garden_plan_id: Uuid,
	pub name: String,
	#[serde(rename = "type")]
	pub plant_type: String,
	pub description: Option<String>,
	pub watering_frequency: Option<String>,
	pub sunlight_requirements: Option<String>,
	pub position_x: Option<i32>,
	pub position_y: Option<i32>,
	pub image_url: Option<String>,
}

/// Terms for the relevance search. Every field is optional; blank strings
/// read as absent.
#[derive(Clone, Debug, Default)]
pub struct PlantSearchRequest {
	pub name: Option<String>,
	pub plant_type: Option<String>,
	pub watering_frequency: Option<String>,
	pub sunlight_requirements: Option<String>,
	pub query: Option<String>,
	pub garden_plan_id: Option<Uuid>,
}
impl PlantSearchRequest {
	fn normalized(mut self) -> Self {
		for field in [
			&mut self.name,
			&mut self.plant_type,
			&mut self.watering_frequency,
			&mut self.sunlight_requirements,
			&mut self.query,
		] {
			if field.as_deref().map(str::trim).is_none_or(str::is_empty) {
				*field = None;
			} else if let Some(value) = field.take() {
				*field = Some(value.trim().to_string());
			}
		}

		self
	}
}

fn sort_column(sort: Option<&str>) -> Result<&'static str> {
	match sort.unwrap_or("name") {
		"name" => Ok("name"),
		"type" => Ok("type"),
		"watering_frequency" => Ok("watering_frequency"),
		"created_at" => Ok("created_at"),
		"updated_at" => Ok("updated_at"),
		other =>
			Err(Error::InvalidRequest { message: format!("Unknown sort column '{other}' for plants.") }),
	}
}

impl TrellisService {
	pub async fn list_plants(&self, request: PageRequest) -> Result<Page<PlantDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let page = page::fetch_page::<Plant>(
			&self.db.pool,
			QueryBuilder::new(SELECT),
			QueryBuilder::new(COUNT),
			&request,
			sort,
		)
		.await?;

		Ok(page.map(PlantDto::from))
	}

	pub async fn list_all_plants(&self) -> Result<Vec<PlantDto>> {
		let rows: Vec<Plant> = sqlx::query_as("SELECT * FROM plants ORDER BY name ASC")
			.fetch_all(&self.db.pool)
			.await?;

		Ok(rows.into_iter().map(PlantDto::from).collect())
	}

	pub async fn get_plant(&self, id: Uuid) -> Result<PlantDto> {
		let row: Option<Plant> = sqlx::query_as("SELECT * FROM plants WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db.pool)
			.await?;

		row.map(PlantDto::from)
			.ok_or_else(|| Error::NotFound { message: "Plant not found.".to_string() })
	}

	pub async fn find_plants_by_garden_plan(
		&self,
		garden_plan_id: Uuid,
		request: PageRequest,
	) -> Result<Page<PlantDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		for builder in [&mut select, &mut count] {
			builder.push(" AND garden_plan_id = ");
			builder.push_bind(garden_plan_id);
		}

		let page = page::fetch_page::<Plant>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(PlantDto::from))
	}

	pub async fn find_plants_by_type(
		&self,
		plant_type: &str,
		request: PageRequest,
	) -> Result<Page<PlantDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		for builder in [&mut select, &mut count] {
			builder.push(" AND type = ");
			builder.push_bind(plant_type.to_string());
		}

		let page = page::fetch_page::<Plant>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(PlantDto::from))
	}

	pub async fn create_plant(&self, input: PlantInput) -> Result<PlantDto> {
		if input.name.trim().is_empty() || input.plant_type.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "name and type are required.".to_string(),
			});
		}

		let now = OffsetDateTime::now_utc();
		let row: Plant = sqlx::query_as(
			"\
INSERT INTO plants (
	garden_plan_id, name, type, description, watering_frequency,
	sunlight_requirements, position_x, position_y, image_url, created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
RETURNING *",
		)
		.bind(input.garden_plan_id)
		.bind(input.name.trim())
		.bind(input.plant_type.trim())
		.bind(input.description.as_deref())
		.bind(input.watering_frequency.as_deref())
		.bind(input.sunlight_requirements.as_deref())
		.bind(input.position_x)
		.bind(input.position_y)
		.bind(input.image_url.as_deref())
		.bind(now)
		.bind(now)
		.fetch_one(&self.db.pool)
		.await?;

		Ok(row.into())
	}

	pub async fn update_plant(&self, id: Uuid, input: PlantInput) -> Result<PlantDto> {
		if input.name.trim().is_empty() || input.plant_type.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "name and type are required.".to_string(),
			});
		}

		let now = OffsetDateTime::now_utc();
		let row: Option<Plant> = sqlx::query_as(
			"\
UPDATE plants
SET
	name = $1, type = $2, description = $3, watering_frequency = $4,
	sunlight_requirements = $5, position_x = $6, position_y = $7,
	image_url = $8, updated_at = $9
WHERE id = $10
RETURNING *",
		)
		.bind(input.name.trim())
		.bind(input.plant_type.trim())
		.bind(input.description.as_deref())
		.bind(input.watering_frequency.as_deref())
		.bind(input.sunlight_requirements.as_deref())
		.bind(input.position_x)
		.bind(input.position_y)
		.bind(input.image_url.as_deref())
		.bind(now)
		.bind(id)
		.fetch_optional(&self.db.pool)
		.await?;

		row.map(PlantDto::from)
			.ok_or_else(|| Error::NotFound { message: "Plant not found.".to_string() })
	}

	/// Deleting an absent plant is a no-op, not an error.
	pub async fn delete_plant(&self, id: Uuid) -> Result<()> {
		sqlx::query("DELETE FROM plants WHERE id = $1").bind(id).execute(&self.db.pool).await?;

		Ok(())
	}

	/// Plain search: one query term ORed across the text columns, optionally
	/// scoped to a garden plan. Ordering follows the pagination request, not
	/// match quality.
	pub async fn search_plants(
		&self,
		query: Option<&str>,
		garden_plan_id: Option<Uuid>,
		request: PageRequest,
	) -> Result<Page<PlantDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		for builder in [&mut select, &mut count] {
			if let Some(query) = query {
				search::push_contains_any(builder, SEARCH_COLUMNS, query);
			}
			if let Some(garden_plan_id) = garden_plan_id {
				builder.push(" AND garden_plan_id = ");
				builder.push_bind(garden_plan_id);
			}
		}

		let page = page::fetch_page::<Plant>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(PlantDto::from))
	}

	/// Relevance-ordered search. A failure in the ranked query is never
	/// surfaced: it is logged and the plain search answers with the same
	/// query and scope instead.
	pub async fn search_plants_with_relevance(
		&self,
		search: PlantSearchRequest,
		request: PageRequest,
	) -> Result<Page<PlantDto>> {
		// The ranked query orders by score and ignores the sort column, but an
		// unknown column must fail here, before either query runs.
		sort_column(request.sort.as_deref())?;

		if request.size == 0 {
			return Err(Error::InvalidRequest {
				message: "Page size must be greater than zero.".to_string(),
			});
		}

		let search = search.normalized();

		search::ranked_or_plain(
			"plants",
			self.plants_relevance_page(&search, &request),
			|| self.search_plants(search.query.as_deref(), search.garden_plan_id, request.clone()),
		)
		.await
	}

	async fn plants_relevance_page(
		&self,
		search: &PlantSearchRequest,
		request: &PageRequest,
	) -> Result<Page<PlantDto>> {
		let rows: Vec<Plant> = sqlx::query_as(RELEVANCE_SELECT)
			.bind(search.name.as_deref())
			.bind(search.plant_type.as_deref())
			.bind(search.watering_frequency.as_deref())
			.bind(search.sunlight_requirements.as_deref())
			.bind(search.query.as_deref())
			.bind(search.garden_plan_id)
			.bind(i64::from(request.size))
			.bind(request.offset())
			.fetch_all(&self.db.pool)
			.await?;
		let total: i64 = sqlx::query_scalar(RELEVANCE_COUNT)
			.bind(search.name.as_deref())
			.bind(search.plant_type.as_deref())
			.bind(search.watering_frequency.as_deref())
			.bind(search.sunlight_requirements.as_deref())
			.bind(search.query.as_deref())
			.bind(search.garden_plan_id)
			.fetch_one(&self.db.pool)
			.await?;

		Ok(Page {
			items: rows.into_iter().map(PlantDto::from).collect(),
			total,
			page: request.page,
			size: request.size,
		})
	}
}
