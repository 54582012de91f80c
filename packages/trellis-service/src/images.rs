use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use trellis_domain::{Page, PageRequest};
use trellis_storage::{models::GardenImage, page};

use crate::{Error, Result, TrellisService};

const SELECT: &str = "SELECT * FROM garden_images WHERE TRUE";
const COUNT: &str = "SELECT count(*) FROM garden_images WHERE TRUE";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GardenImageDto {
	pub id: Uuid,
	pub garden_plan_id: Option<Uuid>,
	pub image_url: String,
	pub title: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<GardenImage> for GardenImageDto {
	fn from(row: GardenImage) -> Self {
		Self {
			id: row.id,
			garden_plan_id: row.garden_plan_id,
			image_url: row.image_url,
			title: row.title,
			created_at: row.created_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct GardenImageInput {
	pub garden_plan_id: Option<Uuid>,
	pub image_url: String,
	pub title: Option<String>,
}

fn sort_column(sort: Option<&str>) -> Result<&'static str> {
	match sort.unwrap_or("created_at") {
		"created_at" => Ok("created_at"),
		"title" => Ok("title"),
		other => Err(Error::InvalidRequest {
			message: format!("Unknown sort column '{other}' for garden images."),
		}),
	}
}

impl TrellisService {
	pub async fn list_garden_images(&self, request: PageRequest) -> Result<Page<GardenImageDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let page = page::fetch_page::<GardenImage>(
			&self.db.pool,
			QueryBuilder::new(SELECT),
			QueryBuilder::new(COUNT),
			&request,
			sort,
		)
		.await?;

		Ok(page.map(GardenImageDto::from))
	}

	pub async fn get_garden_image(&self, id: Uuid) -> Result<GardenImageDto> {
		let row: Option<GardenImage> = sqlx::query_as("SELECT * FROM garden_images WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db.pool)
			.await?;

		row.map(GardenImageDto::from)
			.ok_or_else(|| Error::NotFound { message: "Garden image not found.".to_string() })
	}

	pub async fn find_garden_images_by_plan(
		&self,
		garden_plan_id: Uuid,
		request: PageRequest,
	) -> Result<Page<GardenImageDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		for builder in [&mut select, &mut count] {
			builder.push(" AND garden_plan_id = ");
			builder.push_bind(garden_plan_id);
		}

		let page =
			page::fetch_page::<GardenImage>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(GardenImageDto::from))
	}

	pub async fn create_garden_image(&self, input: GardenImageInput) -> Result<GardenImageDto> {
		if input.image_url.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "image_url is required.".to_string(),
			});
		}

		let row: GardenImage = sqlx::query_as(
			"\
INSERT INTO garden_images (garden_plan_id, image_url, title, created_at)
VALUES ($1, $2, $3, $4)
RETURNING *",
		)
		.bind(input.garden_plan_id)
		.bind(input.image_url.trim())
		.bind(input.title.as_deref())
		.bind(OffsetDateTime::now_utc())
		.fetch_one(&self.db.pool)
		.await?;

		Ok(row.into())
	}

	pub async fn update_garden_image(
		&self,
		id: Uuid,
		input: GardenImageInput,
	) -> Result<GardenImageDto> {
		if input.image_url.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "image_url is required.".to_string(),
			});
		}

		let row: Option<GardenImage> = sqlx::query_as(
			"\
UPDATE garden_images
SET garden_plan_id = $1, image_url = $2, title = $3
WHERE id = $4
RETURNING *",
		)
		.bind(input.garden_plan_id)
		.bind(input.image_url.trim())
		.bind(input.title.as_deref())
		.bind(id)
		.fetch_optional(&self.db.pool)
		.await?;

		row.map(GardenImageDto::from)
			.ok_or_else(|| Error::NotFound { message: "Garden image not found.".to_string() })
	}

	/// Deleting an absent image is a no-op, not an error.
	pub async fn delete_garden_image(&self, id: Uuid) -> Result<()> {
		sqlx::query("DELETE FROM garden_images WHERE id = $1")
			.bind(id)
			.execute(&self.db.pool)
			.await?;

		Ok(())
	}
}
