use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
	Spring,
	Summer,
	Autumn,
	Winter,
}
impl Season {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Spring => "spring",
			Self::Summer => "summer",
			Self::Autumn => "autumn",
			Self::Winter => "winter",
		}
	}
}

const SOUTHERN_COUNTRIES: &[&str] =
	&["australia", "new zealand", "argentina", "chile", "south africa", "brazil"];

/// Derives the season from the calendar month (1-12) and the location's
/// hemisphere. Locations that don't name a known southern-hemisphere country
/// are treated as northern.
pub fn season_for(location: Option<&str>, month: u8) -> Season {
	let southern = location.map(is_southern_hemisphere).unwrap_or(false);

	match month {
		3..=5 =>
			if southern {
				Season::Autumn
			} else {
				Season::Spring
			},
		6..=8 =>
			if southern {
				Season::Winter
			} else {
				Season::Summer
			},
		9..=11 =>
			if southern {
				Season::Spring
			} else {
				Season::Autumn
			},
		_ =>
			if southern {
				Season::Summer
			} else {
				Season::Winter
			},
	}
}

pub fn is_southern_hemisphere(location: &str) -> bool {
	let location = location.to_lowercase();

	SOUTHERN_COUNTRIES.iter().any(|country| location.contains(country))
}
