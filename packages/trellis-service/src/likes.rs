use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use trellis_domain::{Page, PageRequest};
use trellis_storage::{models::ImageLike, page};

use crate::{Error, Result, TrellisService};

const SELECT: &str = "SELECT * FROM image_likes WHERE TRUE";
const COUNT: &str = "SELECT count(*) FROM image_likes WHERE TRUE";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageLikeDto {
	pub id: Uuid,
	pub image_id: Uuid,
	pub user_id: Uuid,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<ImageLike> for ImageLikeDto {
	fn from(row: ImageLike) -> Self {
		Self {
			id: row.id,
			image_id: row.image_id,
			user_id: row.user_id,
			created_at: row.created_at,
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct LikeRequest {
	pub image_id: Uuid,
	pub user_id: Uuid,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct LikeStatus {
	pub liked: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ToggleOutcome {
	/// True when the toggle created a like, false when it removed one.
	pub liked: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct UnlikeOutcome {
	/// True when a like existed and was removed. A repeat unlike reports
	/// false; it is not an error.
	pub removed: bool,
}

fn sort_column(sort: Option<&str>) -> Result<&'static str> {
	match sort.unwrap_or("created_at") {
		"created_at" => Ok("created_at"),
		other => Err(Error::InvalidRequest {
			message: format!("Unknown sort column '{other}' for image likes."),
		}),
	}
}

impl TrellisService {
	pub async fn find_image_likes_by_image(
		&self,
		image_id: Uuid,
		request: PageRequest,
	) -> Result<Page<ImageLikeDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		for builder in [&mut select, &mut count] {
			builder.push(" AND image_id = ");
			builder.push_bind(image_id);
		}

		let page =
			page::fetch_page::<ImageLike>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(ImageLikeDto::from))
	}

	pub async fn count_image_likes(&self, image_id: Uuid) -> Result<i64> {
		let count: i64 =
			sqlx::query_scalar("SELECT count(*) FROM image_likes WHERE image_id = $1")
				.bind(image_id)
				.fetch_one(&self.db.pool)
				.await?;

		Ok(count)
	}

	pub async fn has_user_liked_image(&self, image_id: Uuid, user_id: Uuid) -> Result<LikeStatus> {
		let liked: bool = sqlx::query_scalar(
			"SELECT EXISTS (SELECT 1 FROM image_likes WHERE image_id = $1 AND user_id = $2)",
		)
		.bind(image_id)
		.bind(user_id)
		.fetch_one(&self.db.pool)
		.await?;

		Ok(LikeStatus { liked })
	}

	/// Liking an image twice is a conflict; the toggle operation flips the
	/// state instead.
	pub async fn create_image_like(&self, request: LikeRequest) -> Result<ImageLikeDto> {
		if self.has_user_liked_image(request.image_id, request.user_id).await?.liked {
			return Err(Error::Conflict {
				message: "User has already liked this image.".to_string(),
			});
		}

		let row: ImageLike = sqlx::query_as(
			"\
INSERT INTO image_likes (image_id, user_id, created_at)
VALUES ($1, $2, $3)
RETURNING *",
		)
		.bind(request.image_id)
		.bind(request.user_id)
		.bind(OffsetDateTime::now_utc())
		.fetch_one(&self.db.pool)
		.await?;

		Ok(row.into())
	}

	pub async fn toggle_image_like(&self, request: LikeRequest) -> Result<ToggleOutcome> {
		let removed = sqlx::query("DELETE FROM image_likes WHERE image_id = $1 AND user_id = $2")
			.bind(request.image_id)
			.bind(request.user_id)
			.execute(&self.db.pool)
			.await?
			.rows_affected();

		if removed > 0 {
			return Ok(ToggleOutcome { liked: false });
		}

		sqlx::query("INSERT INTO image_likes (image_id, user_id, created_at) VALUES ($1, $2, $3)")
			.bind(request.image_id)
			.bind(request.user_id)
			.bind(OffsetDateTime::now_utc())
			.execute(&self.db.pool)
			.await?;

		Ok(ToggleOutcome { liked: true })
	}

	/// Idempotent: the first call removes the like, a repeat reports
	/// `removed: false` without erroring.
	pub async fn unlike_image(&self, image_id: Uuid, user_id: Uuid) -> Result<UnlikeOutcome> {
		let removed = sqlx::query("DELETE FROM image_likes WHERE image_id = $1 AND user_id = $2")
			.bind(image_id)
			.bind(user_id)
			.execute(&self.db.pool)
			.await?
			.rows_affected();

		Ok(UnlikeOutcome { removed: removed > 0 })
	}
}
