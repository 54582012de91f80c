use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use trellis_domain::{Page, PageRequest};
use trellis_storage::{models::ImageComment, page};

use crate::{Error, Result, TrellisService};

const SELECT: &str = "SELECT * FROM image_comments WHERE TRUE";
const COUNT: &str = "SELECT count(*) FROM image_comments WHERE TRUE";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageCommentDto {
	pub id: Uuid,
	pub image_id: Uuid,
	pub user_id: Uuid,
	pub comment: String,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<ImageComment> for ImageCommentDto {
	fn from(row: ImageComment) -> Self {
		Self {
			id: row.id,
			image_id: row.image_id,
			user_id: row.user_id,
			comment: row.comment,
			created_at: row.created_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct ImageCommentInput {
	pub image_id: Uuid,
	pub user_id: Uuid,
	pub comment: String,
}

fn sort_column(sort: Option<&str>) -> Result<&'static str> {
	match sort.unwrap_or("created_at") {
		"created_at" => Ok("created_at"),
		other => Err(Error::InvalidRequest {
			message: format!("Unknown sort column '{other}' for image comments."),
		}),
	}
}

impl TrellisService {
	pub async fn list_image_comments(
		&self,
		request: PageRequest,
	) -> Result<Page<ImageCommentDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let page = page::fetch_page::<ImageComment>(
			&self.db.pool,
			QueryBuilder::new(SELECT),
			QueryBuilder::new(COUNT),
			&request,
			sort,
		)
		.await?;

		Ok(page.map(ImageCommentDto::from))
	}

	pub async fn get_image_comment(&self, id: Uuid) -> Result<ImageCommentDto> {
		let row: Option<ImageComment> =
			sqlx::query_as("SELECT * FROM image_comments WHERE id = $1")
				.bind(id)
				.fetch_optional(&self.db.pool)
				.await?;

		row.map(ImageCommentDto::from)
			.ok_or_else(|| Error::NotFound { message: "Comment not found.".to_string() })
	}

	pub async fn find_image_comments_by_image(
		&self,
		image_id: Uuid,
		request: PageRequest,
	) -> Result<Page<ImageCommentDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		for builder in [&mut select, &mut count] {
			builder.push(" AND image_id = ");
			builder.push_bind(image_id);
		}

		let page =
			page::fetch_page::<ImageComment>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(ImageCommentDto::from))
	}

	pub async fn create_image_comment(
		&self,
		input: ImageCommentInput,
	) -> Result<ImageCommentDto> {
		if input.comment.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "comment must not be empty.".to_string(),
			});
		}

		let row: ImageComment = sqlx::query_as(
			"\
INSERT INTO image_comments (image_id, user_id, comment, created_at)
VALUES ($1, $2, $3, $4)
RETURNING *",
		)
		.bind(input.image_id)
		.bind(input.user_id)
		.bind(input.comment.trim())
		.bind(OffsetDateTime::now_utc())
		.fetch_one(&self.db.pool)
		.await?;

		Ok(row.into())
	}

	/// Deleting an absent comment is a no-op, not an error.
	pub async fn delete_image_comment(&self, id: Uuid) -> Result<()> {
		sqlx::query("DELETE FROM image_comments WHERE id = $1")
			.bind(id)
			.execute(&self.db.pool)
			.await?;

		Ok(())
	}
}
