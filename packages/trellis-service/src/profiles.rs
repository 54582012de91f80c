use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use trellis_domain::{Page, PageRequest};
use trellis_storage::{models::Profile, page};

use crate::{Error, Result, TrellisService, search};

const SELECT: &str = "SELECT * FROM profiles WHERE TRUE";
const COUNT: &str = "SELECT count(*) FROM profiles WHERE TRUE";

const RELEVANCE_SELECT: &str = "\
SELECT p.*,
	CASE
		WHEN lower(p.full_name) = lower($1::text) THEN 100
		WHEN p.full_name ILIKE $1::text || '%' THEN 80
		WHEN p.full_name ILIKE '%' || $1::text || '%' THEN 60
		ELSE 0
	END
	+ CASE
		WHEN $2::text IS NOT NULL AND p.full_name ILIKE '%' || $2 || '%' THEN 10
		ELSE 0
	END AS relevance_score
FROM profiles p
WHERE ($1::text IS NULL OR p.full_name ILIKE '%' || $1 || '%')
	AND ($2::text IS NULL OR p.full_name ILIKE '%' || $2 || '%')
ORDER BY relevance_score DESC
LIMIT $3 OFFSET $4";

const RELEVANCE_COUNT: &str = "\
SELECT count(*)
FROM profiles p
WHERE ($1::text IS NULL OR p.full_name ILIKE '%' || $1 || '%')
	AND ($2::text IS NULL OR p.full_name ILIKE '%' || $2 || '%')";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileDto {
	pub id: Uuid,
	pub full_name: Option<String>,
	pub avatar_url: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Profile> for ProfileDto {
	fn from(row: Profile) -> Self {
		Self {
			id: row.id,
			full_name: row.full_name,
			avatar_url: row.avatar_url,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProfileInput {
	pub full_name: Option<String>,
	pub avatar_url: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ProfileSearchRequest {
	pub full_name: Option<String>,
	pub query: Option<String>,
}
impl ProfileSearchRequest {
	fn normalized(mut self) -> Self {
		for field in [&mut self.full_name, &mut self.query] {
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
	match sort.unwrap_or("full_name") {
		"full_name" => Ok("full_name"),
		"created_at" => Ok("created_at"),
		"updated_at" => Ok("updated_at"),
		other => Err(Error::InvalidRequest {
			message: format!("Unknown sort column '{other}' for profiles."),
		}),
	}
}

impl TrellisService {
	pub async fn list_profiles(&self, request: PageRequest) -> Result<Page<ProfileDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let page = page::fetch_page::<Profile>(
			&self.db.pool,
			QueryBuilder::new(SELECT),
			QueryBuilder::new(COUNT),
			&request,
			sort,
		)
		.await?;

		Ok(page.map(ProfileDto::from))
	}

	pub async fn get_profile(&self, id: Uuid) -> Result<ProfileDto> {
		let row: Option<Profile> = sqlx::query_as("SELECT * FROM profiles WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db.pool)
			.await?;

		row.map(ProfileDto::from)
			.ok_or_else(|| Error::NotFound { message: "Profile not found.".to_string() })
	}

	pub async fn find_profiles_by_full_name(
		&self,
		full_name: &str,
		request: PageRequest,
	) -> Result<Page<ProfileDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		search::push_contains_any(&mut select, &["full_name"], full_name);
		search::push_contains_any(&mut count, &["full_name"], full_name);

		let page = page::fetch_page::<Profile>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(ProfileDto::from))
	}

	pub async fn create_profile(&self, input: ProfileInput) -> Result<ProfileDto> {
		let now = OffsetDateTime::now_utc();
		let row: Profile = sqlx::query_as(
			"\
INSERT INTO profiles (full_name, avatar_url, created_at, updated_at)
VALUES ($1, $2, $3, $4)
RETURNING *",
		)
		.bind(input.full_name.as_deref())
		.bind(input.avatar_url.as_deref())
		.bind(now)
		.bind(now)
		.fetch_one(&self.db.pool)
		.await?;

		Ok(row.into())
	}

	pub async fn update_profile(&self, id: Uuid, input: ProfileInput) -> Result<ProfileDto> {
		let now = OffsetDateTime::now_utc();
		let row: Option<Profile> = sqlx::query_as(
			"\
UPDATE profiles
SET full_name = $1, avatar_url = $2, updated_at = $3
WHERE id = $4
RETURNING *",
		)
		.bind(input.full_name.as_deref())
		.bind(input.avatar_url.as_deref())
		.bind(now)
		.bind(id)
		.fetch_optional(&self.db.pool)
		.await?;

		row.map(ProfileDto::from)
			.ok_or_else(|| Error::NotFound { message: "Profile not found.".to_string() })
	}

	/// Deleting an absent profile is a no-op, not an error.
	pub async fn delete_profile(&self, id: Uuid) -> Result<()> {
		sqlx::query("DELETE FROM profiles WHERE id = $1").bind(id).execute(&self.db.pool).await?;

		Ok(())
	}

	/// Plain search over the full name only.
	pub async fn search_profiles(
		&self,
		query: Option<&str>,
		request: PageRequest,
	) -> Result<Page<ProfileDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		if let Some(query) = query {
			search::push_contains_any(&mut select, &["full_name"], query);
			search::push_contains_any(&mut count, &["full_name"], query);
		}

		let page = page::fetch_page::<Profile>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(ProfileDto::from))
	}

	/// Relevance-ordered search with the plain search as its fallback.
	pub async fn search_profiles_with_relevance(
		&self,
		search: ProfileSearchRequest,
		request: PageRequest,
	) -> Result<Page<ProfileDto>> {
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
			"profiles",
			self.profiles_relevance_page(&search, &request),
			|| self.search_profiles(search.query.as_deref(), request.clone()),
		)
		.await
	}

	async fn profiles_relevance_page(
		&self,
		search: &ProfileSearchRequest,
		request: &PageRequest,
	) -> Result<Page<ProfileDto>> {
		let rows: Vec<Profile> = sqlx::query_as(RELEVANCE_SELECT)
			.bind(search.full_name.as_deref())
			.bind(search.query.as_deref())
			.bind(i64::from(request.size))
			.bind(request.offset())
			.fetch_all(&self.db.pool)
			.await?;
		let total: i64 = sqlx::query_scalar(RELEVANCE_COUNT)
			.bind(search.full_name.as_deref())
			.bind(search.query.as_deref())
			.fetch_one(&self.db.pool)
			.await?;

		Ok(Page {
			items: rows.into_iter().map(ProfileDto::from).collect(),
			total,
			page: request.page,
			size: request.size,
		})
	}
}
