use sqlx::{Postgres, QueryBuilder};
use trellis_domain::{BOOL_FILTERS, LibrarySearchCriteria, NUMBER_FILTERS, STRING_FILTERS};

/// Folds the declarative filter table over the criteria, ANDing one
/// predicate per set field: case-insensitive containment for strings,
/// equality for numbers and booleans. Unset fields contribute nothing, so an
/// empty criteria leaves the builder's filter unchanged and the query
/// matches every row. Traversal follows table order, which keeps the
/// generated SQL stable across calls.
pub(crate) fn push_criteria(
	builder: &mut QueryBuilder<'_, Postgres>,
	criteria: &LibrarySearchCriteria,
) {
	for filter in STRING_FILTERS {
		if let Some(value) = (filter.get)(criteria) {
			builder.push(" AND ");
			builder.push(filter.column);
			builder.push(" ILIKE ");
			builder.push_bind(format!("%{value}%"));
		}
	}

	for filter in NUMBER_FILTERS {
		if let Some(value) = (filter.get)(criteria) {
			builder.push(" AND ");
			builder.push(filter.column);
			builder.push(" = ");
			builder.push_bind(value);
		}
	}

	for filter in BOOL_FILTERS {
		if let Some(value) = (filter.get)(criteria) {
			builder.push(" AND ");
			builder.push(filter.column);
			builder.push(" = ");
			builder.push_bind(value);
		}
	}
}

#[cfg(test)]
mod tests {
	use sqlx::{Postgres, QueryBuilder};
	use trellis_domain::LibrarySearchCriteria;

	use super::push_criteria;

	fn compose(criteria: &LibrarySearchCriteria) -> String {
		let mut builder =
			QueryBuilder::<Postgres>::new("SELECT * FROM library_plants WHERE TRUE");

		push_criteria(&mut builder, criteria);

		builder.into_sql()
	}

	#[test]
	fn empty_criteria_composes_an_unconstrained_filter() {
		let sql = compose(&LibrarySearchCriteria::default());

		assert_eq!(sql, "SELECT * FROM library_plants WHERE TRUE");
	}

	#[test]
	fn one_string_field_composes_one_contains_predicate() {
		let criteria =
			LibrarySearchCriteria { climate: Some("tropical".to_string()), ..Default::default() };
		let sql = compose(&criteria);

		assert_eq!(
			sql,
			"SELECT * FROM library_plants WHERE TRUE AND climate ILIKE $1",
		);
	}

	#[test]
	fn set_fields_are_anded_in_table_order() {
		let criteria = LibrarySearchCriteria {
			common_name: Some("rose".to_string()),
			care_level: Some("easy".to_string()),
			time_to_harvest: Some(60.0),
			medicinal: Some(true),
			..Default::default()
		};
		let sql = compose(&criteria);
		let expected = concat!(
			"SELECT * FROM library_plants WHERE TRUE",
			" AND common_name ILIKE $1",
			" AND care_level ILIKE $2",
			" AND time_to_harvest = $3",
			" AND medicinal = $4",
		);

		assert_eq!(sql, expected);
	}

	#[test]
	fn composition_is_deterministic_across_calls() {
		let criteria = LibrarySearchCriteria {
			origin: Some("andes".to_string()),
			soil_type: Some("loam".to_string()),
			flower: Some(false),
			..Default::default()
		};

		assert_eq!(compose(&criteria), compose(&criteria));
	}

	#[test]
	fn numeric_equality_uses_a_bind_not_interpolation() {
		let criteria =
			LibrarySearchCriteria { time_to_harvest: Some(45.5), ..Default::default() };
		let sql = compose(&criteria);

		assert!(sql.ends_with("time_to_harvest = $1"));
		assert!(!sql.contains("45.5"));
	}
}
