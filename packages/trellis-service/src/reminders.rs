use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;
use time::{Date, OffsetDateTime, macros::format_description};
use uuid::Uuid;

use trellis_domain::{Page, PageRequest};
use trellis_providers::mail::EmailMessage;
use trellis_storage::{models::PlantReminder, page};

use crate::{Error, Result, TrellisService};

const SELECT: &str = "SELECT * FROM plant_reminders WHERE TRUE";
const COUNT: &str = "SELECT count(*) FROM plant_reminders WHERE TRUE";

pub(crate) mod date_serde {
	use serde::{Deserialize, Deserializer, Serializer};
	use time::{Date, format_description::FormatItem, macros::format_description};

	const FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

	pub fn serialize<S>(value: &Date, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let formatted = value.format(&FORMAT).map_err(serde::ser::Error::custom)?;

		serializer.serialize_str(&formatted)
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		Date::parse(&raw, &FORMAT).map_err(serde::de::Error::custom)
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlantReminderDto {
	pub id: Uuid,
	pub plant_id: Uuid,
	pub garden_plan_id: Uuid,
	pub reminder_type: String,
	#[serde(with = "date_serde")]
	pub reminder_date: Date,
	pub notes: Option<String>,
	pub is_completed: bool,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}
impl From<PlantReminder> for PlantReminderDto {
	fn from(row: PlantReminder) -> Self {
		Self {
			id: row.id,
			plant_id: row.plant_id,
			garden_plan_id: row.garden_plan_id,
			reminder_type: row.reminder_type,
			reminder_date: row.reminder_date,
			notes: row.notes,
			is_completed: row.is_completed,
			created_at: row.created_at,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlantReminderInput {
	pub plant_id: Uuid,
	pub garden_plan_id: Uuid,
	pub reminder_type: String,
	#[serde(with = "date_serde")]
	pub reminder_date: Date,
	pub notes: Option<String>,
	#[serde(default)]
	pub is_completed: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ReminderEmailRequest {
	pub user_email: String,
	pub plant_name: String,
	pub reminder_type: String,
	pub reminder_date: String,
	pub reminder_time: String,
	pub garden_space_name: String,
	pub notes: Option<String>,
	pub image_url: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SentEmail {
	pub id: String,
}

fn sort_column(sort: Option<&str>) -> Result<&'static str> {
	match sort.unwrap_or("reminder_date") {
		"reminder_date" => Ok("reminder_date"),
		"reminder_type" => Ok("reminder_type"),
		"created_at" => Ok("created_at"),
		other => Err(Error::InvalidRequest {
			message: format!("Unknown sort column '{other}' for plant reminders."),
		}),
	}
}

impl TrellisService {
	pub async fn list_plant_reminders(
		&self,
		request: PageRequest,
	) -> Result<Page<PlantReminderDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let page = page::fetch_page::<PlantReminder>(
			&self.db.pool,
			QueryBuilder::new(SELECT),
			QueryBuilder::new(COUNT),
			&request,
			sort,
		)
		.await?;

		Ok(page.map(PlantReminderDto::from))
	}

	pub async fn get_plant_reminder(&self, id: Uuid) -> Result<PlantReminderDto> {
		let row: Option<PlantReminder> =
			sqlx::query_as("SELECT * FROM plant_reminders WHERE id = $1")
				.bind(id)
				.fetch_optional(&self.db.pool)
				.await?;

		row.map(PlantReminderDto::from)
			.ok_or_else(|| Error::NotFound { message: "Reminder not found.".to_string() })
	}

	pub async fn find_plant_reminders_by_plant(
		&self,
		plant_id: Uuid,
		request: PageRequest,
	) -> Result<Page<PlantReminderDto>> {
		self.find_plant_reminders_by("plant_id", plant_id, request).await
	}

	pub async fn find_plant_reminders_by_plan(
		&self,
		garden_plan_id: Uuid,
		request: PageRequest,
	) -> Result<Page<PlantReminderDto>> {
		self.find_plant_reminders_by("garden_plan_id", garden_plan_id, request).await
	}

	pub async fn create_plant_reminder(
		&self,
		input: PlantReminderInput,
	) -> Result<PlantReminderDto> {
		if input.reminder_type.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "reminder_type is required.".to_string(),
			});
		}

		let row: PlantReminder = sqlx::query_as(
			"\
INSERT INTO plant_reminders (
	plant_id, garden_plan_id, reminder_type, reminder_date, notes,
	is_completed, created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7)
RETURNING *",
		)
		.bind(input.plant_id)
		.bind(input.garden_plan_id)
		.bind(input.reminder_type.trim())
		.bind(input.reminder_date)
		.bind(input.notes.as_deref())
		.bind(input.is_completed)
		.bind(OffsetDateTime::now_utc())
		.fetch_one(&self.db.pool)
		.await?;

		Ok(row.into())
	}

	pub async fn update_plant_reminder(
		&self,
		id: Uuid,
		input: PlantReminderInput,
	) -> Result<PlantReminderDto> {
		if input.reminder_type.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "reminder_type is required.".to_string(),
			});
		}

		let row: Option<PlantReminder> = sqlx::query_as(
			"\
UPDATE plant_reminders
SET
	plant_id = $1, garden_plan_id = $2, reminder_type = $3,
	reminder_date = $4, notes = $5, is_completed = $6
WHERE id = $7
RETURNING *",
		)
		.bind(input.plant_id)
		.bind(input.garden_plan_id)
		.bind(input.reminder_type.trim())
		.bind(input.reminder_date)
		.bind(input.notes.as_deref())
		.bind(input.is_completed)
		.bind(id)
		.fetch_optional(&self.db.pool)
		.await?;

		row.map(PlantReminderDto::from)
			.ok_or_else(|| Error::NotFound { message: "Reminder not found.".to_string() })
	}

	/// Deleting an absent reminder is a no-op, not an error.
	pub async fn delete_plant_reminder(&self, id: Uuid) -> Result<()> {
		sqlx::query("DELETE FROM plant_reminders WHERE id = $1")
			.bind(id)
			.execute(&self.db.pool)
			.await?;

		Ok(())
	}

	pub async fn send_reminder_email(&self, request: ReminderEmailRequest) -> Result<SentEmail> {
		for (label, value) in [
			("plant_name", &request.plant_name),
			("reminder_type", &request.reminder_type),
			("reminder_date", &request.reminder_date),
			("reminder_time", &request.reminder_time),
			("garden_space_name", &request.garden_space_name),
		] {
			if value.trim().is_empty() {
				return Err(Error::InvalidRequest {
					message: format!("{label} is required."),
				});
			}
		}
		if !request.user_email.contains('@') {
			return Err(Error::InvalidRequest {
				message: "user_email must be an email address.".to_string(),
			});
		}

		let message = EmailMessage {
			to: request.user_email.clone(),
			subject: format!(
				"Plant Care Reminder: {} for {}",
				request.reminder_type, request.plant_name,
			),
			html: render_reminder_html(&request),
		};
		let id = self
			.providers
			.mail
			.send(&self.cfg.providers.mail, &message)
			.await
			.map_err(|err| Error::Provider { message: err.to_string() })?;

		tracing::info!(email_id = %id, plant = %request.plant_name, "Reminder email sent.");

		Ok(SentEmail { id })
	}

	async fn find_plant_reminders_by(
		&self,
		column: &str,
		id: Uuid,
		request: PageRequest,
	) -> Result<Page<PlantReminderDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new(SELECT);
		let mut count = QueryBuilder::new(COUNT);

		for builder in [&mut select, &mut count] {
			builder.push(" AND ");
			builder.push(column);
			builder.push(" = ");
			builder.push_bind(id);
		}

		let page =
			page::fetch_page::<PlantReminder>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(PlantReminderDto::from))
	}
}

fn render_reminder_html(request: &ReminderEmailRequest) -> String {
	let mut body = format!(
		"<h2>Time to care for {plant}</h2>\
		 <p><strong>{reminder}</strong> in {space} on {date} at {time}.</p>",
		plant = request.plant_name,
		reminder = request.reminder_type,
		space = request.garden_space_name,
		date = friendly_date(&request.reminder_date),
		time = request.reminder_time,
	);

	if let Some(notes) = request.notes.as_deref().filter(|notes| !notes.trim().is_empty()) {
		body.push_str(&format!("<p>Notes: {notes}</p>"));
	}
	if let Some(url) = request.image_url.as_deref().filter(|url| !url.trim().is_empty()) {
		body.push_str(&format!("<img src=\"{url}\" alt=\"{}\" />", request.plant_name));
	}

	body
}

/// Renders `2026-08-07` as `August 7, 2026`; unparseable input passes
/// through untouched.
fn friendly_date(raw: &str) -> String {
	let input = format_description!("[year]-[month]-[day]");
	let output = format_description!("[month repr:long] [day padding:none], [year]");

	Date::parse(raw, &input)
		.ok()
		.and_then(|date| date.format(&output).ok())
		.unwrap_or_else(|| raw.to_string())
}
