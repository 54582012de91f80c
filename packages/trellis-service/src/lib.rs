pub mod comments;
pub mod garden_plans;
pub mod images;
pub mod library;
pub mod likes;
pub mod pests_diseases;
pub mod plants;
pub mod profiles;
pub mod recommend;
pub mod reminders;
pub mod search;
pub mod time_serde;
pub mod weather;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

pub use comments::{ImageCommentDto, ImageCommentInput};
pub use garden_plans::{GardenPlanDto, GardenPlanInput, GardenPlanSearchRequest};
pub use images::{GardenImageDto, GardenImageInput};
pub use library::{LibraryPlantDto, LibraryPlantInput};
pub use likes::{ImageLikeDto, LikeRequest, LikeStatus, ToggleOutcome, UnlikeOutcome};
pub use pests_diseases::{PestDto, PlantDiseaseDto};
pub use plants::{PlantDto, PlantInput, PlantSearchRequest};
pub use profiles::{ProfileDto, ProfileInput, ProfileSearchRequest};
pub use recommend::{
	PlantRecommendation, RecommendationMeta, RecommendationRequest, RecommendationResponse,
	UserPreferences,
};
pub use reminders::{PlantReminderDto, PlantReminderInput, ReminderEmailRequest, SentEmail};
pub use weather::{ForecastItem, WeatherReport};

use trellis_config::{
	CompletionProviderConfig, Config, ImageSearchProviderConfig, MailProviderConfig,
	WeatherProviderConfig,
};
use trellis_providers::{
	mail::EmailMessage,
	weather::{CurrentWeather, ForecastDay},
};
use trellis_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait WeatherProvider
where
	Self: Send + Sync,
{
	fn current<'a>(
		&'a self,
		cfg: &'a WeatherProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, trellis_providers::Result<CurrentWeather>>;

	fn forecast<'a>(
		&'a self,
		cfg: &'a WeatherProviderConfig,
		query: &'a str,
		days: u32,
	) -> BoxFuture<'a, trellis_providers::Result<Vec<ForecastDay>>>;
}

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a CompletionProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, trellis_providers::Result<String>>;
}

pub trait ImageSearchProvider
where
	Self: Send + Sync,
{
	fn search_photo<'a>(
		&'a self,
		cfg: &'a ImageSearchProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, trellis_providers::Result<Option<String>>>;
}

pub trait MailProvider
where
	Self: Send + Sync,
{
	fn send<'a>(
		&'a self,
		cfg: &'a MailProviderConfig,
		message: &'a EmailMessage,
	) -> BoxFuture<'a, trellis_providers::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub weather: Arc<dyn WeatherProvider>,
	pub completion: Arc<dyn CompletionProvider>,
	pub image_search: Arc<dyn ImageSearchProvider>,
	pub mail: Arc<dyn MailProvider>,
}
impl Default for Providers {
	fn default() -> Self {
		Self {
			weather: Arc::new(DefaultProviders),
			completion: Arc::new(DefaultProviders),
			image_search: Arc::new(DefaultProviders),
			mail: Arc::new(DefaultProviders),
		}
	}
}

pub struct TrellisService {
	pub cfg: Config,
	pub db: Db,
	pub providers: Providers,
}
impl TrellisService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, db: Db, providers: Providers) -> Self {
		Self { cfg, db, providers }
	}
}

struct DefaultProviders;

impl WeatherProvider for DefaultProviders {
	fn current<'a>(
		&'a self,
		cfg: &'a WeatherProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, trellis_providers::Result<CurrentWeather>> {
		Box::pin(trellis_providers::weather::current(cfg, query))
	}

	fn forecast<'a>(
		&'a self,
		cfg: &'a WeatherProviderConfig,
		query: &'a str,
		days: u32,
	) -> BoxFuture<'a, trellis_providers::Result<Vec<ForecastDay>>> {
		Box::pin(trellis_providers::weather::forecast(cfg, query, days))
	}
}

impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a CompletionProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, trellis_providers::Result<String>> {
		Box::pin(trellis_providers::completion::complete(cfg, messages))
	}
}

impl ImageSearchProvider for DefaultProviders {
	fn search_photo<'a>(
		&'a self,
		cfg: &'a ImageSearchProviderConfig,
		query: &'a str,
	) -> BoxFuture<'a, trellis_providers::Result<Option<String>>> {
		Box::pin(trellis_providers::images::search_photo(cfg, query))
	}
}

impl MailProvider for DefaultProviders {
	fn send<'a>(
		&'a self,
		cfg: &'a MailProviderConfig,
		message: &'a EmailMessage,
	) -> BoxFuture<'a, trellis_providers::Result<String>> {
		Box::pin(trellis_providers::mail::send(cfg, message))
	}
}
