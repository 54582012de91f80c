/// Optional filters for one library advanced search. Every field is
/// optional; an unset field never constrains the result set. Blank strings
/// count as unset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LibrarySearchCriteria {
	pub common_name: Option<String>,
	pub other_name: Option<String>,
	pub scientific_name: Option<String>,
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
	pub best_planting_season: Option<String>,
	pub time_to_harvest: Option<f64>,
	pub flower: Option<bool>,
	pub fruit: Option<bool>,
	pub medicinal: Option<bool>,
}
impl LibrarySearchCriteria {
	/// Normalizes every string field so blank input reads as absent.
	pub fn normalized(mut self) -> Self {
		for filter in STRING_FILTERS {
			let field = (filter.get_mut)(&mut self);

			if field.as_deref().map(str::trim).is_none_or(str::is_empty) {
				*field = None;
			} else if let Some(value) = field.take() {
				*field = Some(value.trim().to_string());
			}
		}

		self
	}

	pub fn is_empty(&self) -> bool {
		STRING_FILTERS.iter().all(|filter| (filter.get)(self).is_none())
			&& NUMBER_FILTERS.iter().all(|filter| (filter.get)(self).is_none())
			&& BOOL_FILTERS.iter().all(|filter| (filter.get)(self).is_none())
	}
}

/// One row of the declarative filter table: the stored column a criteria
/// field constrains, plus accessors. String fields match by case-insensitive
/// containment; number and boolean fields match by equality. Table order is
/// the traversal order of the predicate composer, so it must stay stable.
pub struct StringFilter {
	pub column: &'static str,
	pub get: fn(&LibrarySearchCriteria) -> Option<&str>,
	pub get_mut: fn(&mut LibrarySearchCriteria) -> &mut Option<String>,
}

pub struct NumberFilter {
	pub column: &'static str,
	pub get: fn(&LibrarySearchCriteria) -> Option<f64>,
}

pub struct BoolFilter {
	pub column: &'static str,
	pub get: fn(&LibrarySearchCriteria) -> Option<bool>,
}

macro_rules! string_filter {
	($column:literal, $field:ident) => {
		StringFilter {
			column: $column,
			get: |criteria| criteria.$field.as_deref(),
			get_mut: |criteria| &mut criteria.$field,
		}
	};
}

pub const STRING_FILTERS: &[StringFilter] = &[
	string_filter!("common_name", common_name),
	string_filter!("other_name", other_name),
	string_filter!("scientific_name", scientific_name),
	string_filter!("origin", origin),
	string_filter!("plant_type", plant_type),
	string_filter!("climate", climate),
	string_filter!("life_cycle", life_cycle),
	string_filter!("watering_frequency", watering_frequency),
	string_filter!("soil_type", soil_type),
	string_filter!("size", size),
	string_filter!("sunlight_requirement", sunlight_requirement),
	string_filter!("growth_rate", growth_rate),
	string_filter!("ideal_place", ideal_place),
	string_filter!("care_level", care_level),
	string_filter!("best_planting_season", best_planting_season),
];

pub const NUMBER_FILTERS: &[NumberFilter] =
	&[NumberFilter { column: "time_to_harvest", get: |criteria| criteria.time_to_harvest }];

pub const BOOL_FILTERS: &[BoolFilter] = &[
	BoolFilter { column: "flower", get: |criteria| criteria.flower },
	BoolFilter { column: "fruit", get: |criteria| criteria.fruit },
	BoolFilter { column: "medicinal", get: |criteria| criteria.medicinal },
];
