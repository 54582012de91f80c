pub mod criteria;
pub mod page;
pub mod season;

pub use criteria::{
	BOOL_FILTERS, BoolFilter, LibrarySearchCriteria, NUMBER_FILTERS, NumberFilter, STRING_FILTERS,
	StringFilter,
};
pub use page::{Page, PageRequest, SortDirection};
pub use season::{Season, is_southern_hemisphere, season_for};
