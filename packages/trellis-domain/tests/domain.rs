use trellis_domain::{
	BOOL_FILTERS, LibrarySearchCriteria, NUMBER_FILTERS, Page, PageRequest, STRING_FILTERS, Season,
	SortDirection, season_for,
};

#[test]
fn blank_criteria_fields_read_as_absent() {
	let criteria = LibrarySearchCriteria {
		common_name: Some("   ".to_string()),
		origin: Some("".to_string()),
		plant_type: Some("  Herb ".to_string()),
		..Default::default()
	}
	.normalized();

	assert_eq!(criteria.common_name, None);
	assert_eq!(criteria.origin, None);
	assert_eq!(criteria.plant_type.as_deref(), Some("Herb"));
	assert!(!criteria.is_empty());
}

#[test]
fn default_criteria_is_empty() {
	assert!(LibrarySearchCriteria::default().is_empty());

	let numeric_only =
		LibrarySearchCriteria { time_to_harvest: Some(60.0), ..Default::default() };

	assert!(!numeric_only.is_empty());

	let boolean_only = LibrarySearchCriteria { medicinal: Some(false), ..Default::default() };

	assert!(!boolean_only.is_empty());
}

#[test]
fn filter_table_covers_every_criteria_field() {
	// 15 string + 1 numeric + 3 boolean fields.
	assert_eq!(STRING_FILTERS.len(), 15);
	assert_eq!(NUMBER_FILTERS.len(), 1);
	assert_eq!(BOOL_FILTERS.len(), 3);

	let mut columns: Vec<&str> = STRING_FILTERS
		.iter()
		.map(|filter| filter.column)
		.chain(NUMBER_FILTERS.iter().map(|filter| filter.column))
		.chain(BOOL_FILTERS.iter().map(|filter| filter.column))
		.collect();
	let before = columns.len();

	columns.sort_unstable();
	columns.dedup();

	assert_eq!(columns.len(), before, "filter table must not repeat a column");
}

#[test]
fn sort_direction_parses_case_insensitively() {
	assert_eq!(SortDirection::parse(None), Some(SortDirection::Asc));
	assert_eq!(SortDirection::parse(Some("")), Some(SortDirection::Asc));
	assert_eq!(SortDirection::parse(Some("asc")), Some(SortDirection::Asc));
	assert_eq!(SortDirection::parse(Some("DESC")), Some(SortDirection::Desc));
	assert_eq!(SortDirection::parse(Some("sideways")), None);
}

#[test]
fn page_request_offset_scales_with_page() {
	let request =
		PageRequest { page: 3, size: 25, sort: None, direction: SortDirection::Asc };

	assert_eq!(request.offset(), 75);
}

#[test]
fn page_map_preserves_paging_metadata() {
	let page = Page { items: vec![1, 2, 3], total: 42, page: 1, size: 3 };
	let mapped = page.map(|value| value * 10);

	assert_eq!(mapped.items, vec![10, 20, 30]);
	assert_eq!(mapped.total, 42);
	assert_eq!(mapped.page, 1);
	assert_eq!(mapped.size, 3);
}

#[test]
fn season_flips_between_hemispheres() {
	assert_eq!(season_for(Some("London, UK"), 7), Season::Summer);
	assert_eq!(season_for(Some("Sydney, Australia"), 7), Season::Winter);
	assert_eq!(season_for(Some("Buenos Aires, Argentina"), 1), Season::Summer);
	assert_eq!(season_for(None, 1), Season::Winter);
	assert_eq!(season_for(Some("Oslo"), 10), Season::Autumn);
	assert_eq!(season_for(Some("Cape Town, South Africa"), 10), Season::Spring);
}
