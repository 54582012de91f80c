use serde::{Deserialize, Serialize};
use sqlx::QueryBuilder;
use time::OffsetDateTime;

use trellis_domain::{Page, PageRequest};
use trellis_storage::{
	models::{Pest, PlantDisease},
	page,
};

use crate::{Error, Result, TrellisService, search};

const SEARCH_COLUMNS: &[&str] = &["common_name", "scientific_name", "description"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PestDto {
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
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<Pest> for PestDto {
	fn from(row: Pest) -> Self {
		Self {
			id: row.id,
			common_name: row.common_name,
			scientific_name: row.scientific_name,
			description: row.description,
			damage_symptoms: row.damage_symptoms,
			life_cycle: row.life_cycle,
			season_active: row.season_active,
			organic_control: row.organic_control,
			chemical_control: row.chemical_control,
			prevention_tips: row.prevention_tips,
			image_url: row.image_url,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlantDiseaseDto {
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
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
}
impl From<PlantDisease> for PlantDiseaseDto {
	fn from(row: PlantDisease) -> Self {
		Self {
			id: row.id,
			common_name: row.common_name,
			scientific_name: row.scientific_name,
			description: row.description,
			symptoms: row.symptoms,
			cause: row.cause,
			season_active: row.season_active,
			organic_control: row.organic_control,
			chemical_control: row.chemical_control,
			prevention_tips: row.prevention_tips,
			image_url: row.image_url,
			created_at: row.created_at,
			updated_at: row.updated_at,
		}
	}
}

fn sort_column(sort: Option<&str>) -> Result<&'static str> {
	match sort.unwrap_or("common_name") {
		"common_name" => Ok("common_name"),
		"scientific_name" => Ok("scientific_name"),
		"created_at" => Ok("created_at"),
		other => Err(Error::InvalidRequest {
			message: format!("Unknown sort column '{other}' for pests and diseases."),
		}),
	}
}

impl TrellisService {
	pub async fn list_pests(&self, request: PageRequest) -> Result<Page<PestDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let page = page::fetch_page::<Pest>(
			&self.db.pool,
			QueryBuilder::new("SELECT * FROM pests WHERE TRUE"),
			QueryBuilder::new("SELECT count(*) FROM pests WHERE TRUE"),
			&request,
			sort,
		)
		.await?;

		Ok(page.map(PestDto::from))
	}

	pub async fn get_pest(&self, id: i64) -> Result<PestDto> {
		let row: Option<Pest> = sqlx::query_as("SELECT * FROM pests WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db.pool)
			.await?;

		row.map(PestDto::from)
			.ok_or_else(|| Error::NotFound { message: "Pest not found.".to_string() })
	}

	pub async fn search_pests(
		&self,
		query: Option<&str>,
		request: PageRequest,
	) -> Result<Page<PestDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new("SELECT * FROM pests WHERE TRUE");
		let mut count = QueryBuilder::new("SELECT count(*) FROM pests WHERE TRUE");

		if let Some(query) = query {
			search::push_contains_any(&mut select, SEARCH_COLUMNS, query);
			search::push_contains_any(&mut count, SEARCH_COLUMNS, query);
		}

		let page = page::fetch_page::<Pest>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(PestDto::from))
	}

	pub async fn list_plant_diseases(&self, request: PageRequest) -> Result<Page<PlantDiseaseDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let page = page::fetch_page::<PlantDisease>(
			&self.db.pool,
			QueryBuilder::new("SELECT * FROM plant_diseases WHERE TRUE"),
			QueryBuilder::new("SELECT count(*) FROM plant_diseases WHERE TRUE"),
			&request,
			sort,
		)
		.await?;

		Ok(page.map(PlantDiseaseDto::from))
	}

	pub async fn get_plant_disease(&self, id: i64) -> Result<PlantDiseaseDto> {
		let row: Option<PlantDisease> = sqlx::query_as("SELECT * FROM plant_diseases WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.db.pool)
			.await?;

		row.map(PlantDiseaseDto::from)
			.ok_or_else(|| Error::NotFound { message: "Plant disease not found.".to_string() })
	}

	pub async fn search_plant_diseases(
		&self,
		query: Option<&str>,
		request: PageRequest,
	) -> Result<Page<PlantDiseaseDto>> {
		let sort = sort_column(request.sort.as_deref())?;
		let mut select = QueryBuilder::new("SELECT * FROM plant_diseases WHERE TRUE");
		let mut count = QueryBuilder::new("SELECT count(*) FROM plant_diseases WHERE TRUE");

		if let Some(query) = query {
			search::push_contains_any(&mut select, SEARCH_COLUMNS, query);
			search::push_contains_any(&mut count, SEARCH_COLUMNS, query);
		}

		let page =
			page::fetch_page::<PlantDisease>(&self.db.pool, select, count, &request, sort).await?;

		Ok(page.map(PlantDiseaseDto::from))
	}
}
