use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use trellis_domain::{Page, PageRequest};
use trellis_storage::{models::GardenPlan, page};

use crate::{Error, Result, TrellisService, search};

const SEARCH_COLUMNS: &[&str] = &["name", "description", "type", "location"];

const SELECT: &str = "SELECT * FROM garden_plans WHERE TRUE";
const COUNT: &str = "SELECT count(*) FROM garden_plans WHERE TRUE";

const RELEVANCE_SELECT: &str = "\
SELECT g.*,
	CASE
		WHEN lower(g.name) = lower($1::text) THEN 100
		WHEN g.name ILIKE $1::text || '%' THEN 80
		WHEN g.name ILIKE '%' || $1::text || '%' THEN 60
		ELSE 0
	END
	+ CASE
		WHEN lower(g.type) = lower($2::text) THEN 50
		WHEN g.type ILIKE $2::text || '%' THEN 40
		WHEN g.type ILIKE '%' || $2::text || '%' THEN 30
		ELSE 0
	END
	+ CASE
		WHEN lower(g.location) = lower($3::text) THEN 25
		WHEN g.location ILIKE $3::text || '%' THEN 20
		WHEN g.location ILIKE '%' || $3::text || '%' THEN 15
		ELSE 0
	END
	+ CASE
		WHEN $4::text IS NOT NULL
			AND (g.name ILIKE '%' || $4 || '%'
				OR g.description ILIKE '%' || $4 || '%'
				OR g.type ILIKE '%' || $4 || '%'
				OR g.location ILIKE '%' || $4 || '%')
			THEN 10
		ELSE 0
	END AS relevance_score
FROM garden_plans g
WHERE ($1::text IS NULL OR g.name ILIKE '%' || $1 || '%')
	AND ($2::text IS NULL OR g.type ILIKE '%' || $2 || '%')
	AND ($3::text IS NULL OR g.location ILIKE '%' || $3 || '%')
	AND ($4::text IS NULL
		OR g.name ILIKE '%' || $4 || '%'
		OR g.description ILIKE '%' || $4 || '%'
		OR g.type ILIKE '%' || $4 || '%'
		OR g.location ILIKE '%' || $4 || '%')
	AND ($5::uuid IS NULL OR g.user_id = $5)
	AND ($6::boolean IS NULL OR g.is_public = $6)
ORDER BY relevance_score DESC
LIMIT $7 OFFSET $8";

const RELEVANCE_COUNT: &str = "\
SELECT count(*)
FROM garden_plans g
WHERE ($1::text IS NULL OR g.name ILIKE '%' || $1 || '%')
	AND ($2::text IS NULL OR g.type ILIKE '%' || $2 || '%')
	AND ($3::text IS NULL OR g.location ILIKE '%' || $3 || '%')
	AND ($4::text IS NULL
		OR g.name ILIKE '%' || $4 || '%'
		OR g.description ILIKE '%' || $4 || '%'
		OR g.type ILIKE '%' || $4 || '%'
		OR g.location ILIKE '%' || $4 || '%')
	AND ($5::uuid IS NULL OR g.user_id = $5)
	AND ($6::boolean IS NULL OR g.is_public = $6)";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GardenPlanDto {
	pub id: Uuid,
	pub user_id: Uuid,
	pub name: String,
	#[serde(rename = "type")]
	pub plan_type: String,
	pub description: Option<String>,
	pub location: Option<String>,
	pub thumbnail_url: Option<String>,
	pub is_public: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<GardenPlan> for GardenPlanDto {
	fn from(row: GardenPlan) -> Self {
		Self {
			id: row.id,
			user_id: row.user_id,
			name: row.name,
			plan_type: row.r#type,
			description: row.description,
			location: row.location,
			thumbnail_url: row.thumbnail_url,
			is_public: row.is_public,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct GardenPlanInput {
	pub user_id: Uuid,
	pub name: String,
	#[serde(rename = "type")]
	pub plan_type: String,
	pub description: Option<String>,
	pub location: Option<String>,
	pub thumbnail_url: Option<String>,
	#[serde(default)]
	pub is_public: bool,
}

#[derive(Clone, Debug, Default)]
pub struct GardenPlanSearchRequest {
	pub name: Option<String>,
	pub plan_type: Option<String>,
	pub location: Option<String>,
	pub query: Option<String>,
	pub user_id: Option<Uuid>,
	pub is_public: Option<bool>,
}
impl GardenPlanSearchRequest {
	fn normalized(mut self) -> Self {
		for field in
			[&mut self.name, &mut self.plan_type, &mut self.location, &mut self.query]
		{
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
		"location" => Ok("location"),
		"created_at" => Ok("created_at"),
		"updated_at" => Ok("updated_at"),
		other => Err(Error::InvalidRequest {
			message: format!("Unknown sort column '{other}' for garden plans."),
		}),
	}
}

impl TrellisService {
	pub async fn list_garden_plans(&self, request: PageRequest) -> Result<Page<GardenPlanDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let page = page::fetch_page::<GardenPlan>(
			&self.db.pool,
			QueryBuilder::new(SELECT),
			QueryBuilder::new(COUNT),
			&request,
			sort,
		)
		.await?;

		Ok(page.map(GardenPlanDto::from))
	}

	pub async fn list_all_garden_plans(&self) -> Result<Vec<GardenPlanDto>> {
		let rows: Vec<GardenPlan> = sqlx::query_as("SELECT * FROM garden_plans ORDER BY name ASC")
			.fetch_all(&self.db.pool)
			.await?;

		Ok(rows.into_iter().map(GardenPlanDto::from).collect())
	}

	pub async fn get_garden_plan(&self, id: Uuid) -> Result<GardenPlanDto> {
		let row: Option<GardenPlan> = sqlx::query_as("SELECT * FROM garden_plans WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db.pool)
			.await?;

		row.map(GardenPlanDto::from)
			.ok_or_else(|| Error::NotFound { message: "Garden plan not found.".to_string() })
	}

	pub async fn find_garden_plans_by_user(
		&self,
		user_id: Uuid,
		request: PageRequest,
	) -> Result<Page<GardenPlanDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		for builder in [&mut select, &mut count] {
			builder.push(" AND user_id = ");
			builder.push_bind(user_id);
		}

		let page =
			page::fetch_page::<GardenPlan>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(GardenPlanDto::from))
	}

	pub async fn find_public_garden_plans(
		&self,
		request: PageRequest,
	) -> Result<Page<GardenPlanDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		for builder in [&mut select, &mut count] {
			builder.push(" AND is_public = TRUE");
		}

		let page =
			page::fetch_page::<GardenPlan>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(GardenPlanDto::from))
	}

	pub async fn create_garden_plan(&self, input: GardenPlanInput) -> Result<GardenPlanDto> {
		if input.name.trim().is_empty() || input.plan_type.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "name and type are required.".to_string(),
			});
		}

		let now = OffsetDateTime::now_utc();
		let row: GardenPlan = sqlx::query_as(
			"\
INSERT INTO garden_plans (
	user_id, name, type, description, location, thumbnail_url, is_public,
	created_at, updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
RETURNING *",
		)
		.bind(input.user_id)
		.bind(input.name.trim())
		.bind(input.plan_type.trim())
		.bind(input.description.as_deref())
		.bind(input.location.as_deref())
		.bind(input.thumbnail_url.as_deref())
		.bind(input.is_public)
		.bind(now)
		.bind(now)
		.fetch_one(&self.db.pool)
		.await?;

		Ok(row.into())
	}

	pub async fn update_garden_plan(
		&self,
		id: Uuid,
		input: GardenPlanInput,
	) -> Result<GardenPlanDto> {
		if input.name.trim().is_empty() || input.plan_type.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "name and type are required.".to_string(),
			});
		}

		let now = OffsetDateTime::now_utc();
		let row: Option<GardenPlan> = sqlx::query_as(
			"\
UPDATE garden_plans
SET
	name = $1, type = $2, description = $3, location = $4,
	thumbnail_url = $5, is_public = $6, updated_at = $7
WHERE id = $8
RETURNING *",
		)
		.bind(input.name.trim())
		.bind(input.plan_type.trim())
		.bind(input.description.as_deref())
		.bind(input.location.as_deref())
		.bind(input.thumbnail_url.as_deref())
		.bind(input.is_public)
		.bind(now)
		.bind(id)
		.fetch_optional(&self.db.pool)
		.await?;

		row.map(GardenPlanDto::from)
			.ok_or_else(|| Error::NotFound { message: "Garden plan not found.".to_string() })
	}

	/// Deleting an absent plan is a no-op, not an error.
	pub async fn delete_garden_plan(&self, id: Uuid) -> Result<()> {
		sqlx::query("DELETE FROM garden_plans WHERE id = $1")
			.bind(id)
			.execute(&self.db.pool)
			.await?;

		Ok(())
	}

	pub async fn search_garden_plans(
		&self,
		query: Option<&str>,
		user_id: Option<Uuid>,
		is_public: Option<bool>,
		request: PageRequest,
	) -> Result<Page<GardenPlanDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		for builder in [&mut select, &mut count] {
			if let Some(query) = query {
				search::push_contains_any(builder, SEARCH_COLUMNS, query);
			}
			if let Some(user_id) = user_id {
				builder.push(" AND user_id = ");
				builder.push_bind(user_id);
			}
			if let Some(is_public) = is_public {
				builder.push(" AND is_public = ");
				builder.push_bind(is_public);
			}
		}

		let page =
			page::fetch_page::<GardenPlan>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(GardenPlanDto::from))
	}

	/// Relevance-ordered search with the plain search as its fallback.
	pub async fn search_garden_plans_with_relevance(
		&self,
		search: GardenPlanSearchRequest,
		request: PageRequest,
	) -> Result<Page<GardenPlanDto>> {
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
			"garden_plans",
			self.garden_plans_relevance_page(&search, &request),
			|| {
				self.search_garden_plans(
					search.query.as_deref(),
					search.user_id,
					search.is_public,
					request.clone(),
				)
			},
		)
		.await
	}

	async fn garden_plans_relevance_page(
		&self,
		search: &GardenPlanSearchRequest,
		request: &PageRequest,
	) -> Result<Page<GardenPlanDto>> {
		let rows: Vec<GardenPlan> = sqlx::query_as(RELEVANCE_SELECT)
			.bind(search.name.as_deref())
			.bind(search.plan_type.as_deref())
			.bind(search.location.as_deref())
			.bind(search.query.as_deref())
			.bind(search.user_id)
			.bind(search.is_public)
			.bind(i64::from(request.size))
			.bind(request.offset())
			.fetch_all(&self.db.pool)
			.await?;
		let total: i64 = sqlx::query_scalar(RELEVANCE_COUNT)
			.bind(search.name.as_deref())
			.bind(search.plan_type.as_deref())
			.bind(search.location.as_deref())
			.bind(search.query.as_deref())
			.bind(search.user_id)
			.bind(search.is_public)
			.fetch_one(&self.db.pool)
			.await?;

		Ok(Page {
			items: rows.into_iter().map(GardenPlanDto::from).collect(),
			total,
			page: request.page,
			size: request.size,
		})
	}
}
