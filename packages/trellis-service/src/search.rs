pub mod filter;

use std::future::Future;

use sqlx::{Postgres, QueryBuilder};

use crate::{Error, Result};

/// Graceful degradation for ranked queries: run the relevance-ordered query
/// and, if the storage layer fails it, answer with the plain query instead.
/// Caller-input errors pass through untouched so the fallback never hides a
/// bad request.
pub(crate) async fn ranked_or_plain<T, RF, PF>(
	what: &str,
	ranked: RF,
	plain: impl FnOnce() -> PF,
) -> Result<T>
where
	RF: Future<Output = Result<T>>,
	PF: Future<Output = Result<T>>,
{
	match ranked.await {
		Ok(value) => Ok(value),
		Err(
			err @ (Error::InvalidRequest { .. } | Error::NotFound { .. } | Error::Conflict { .. }),
		) => Err(err),
		Err(err) => {
			tracing::warn!(
				error = %err,
				search = what,
				"Relevance search failed; falling back to plain search."
			);

			plain().await
		},
	}
}

/// ANDs in one `(col ILIKE %query% OR col ILIKE %query% ...)` group over a
/// fixed column list. A blank query pushes nothing, leaving the builder's
/// filter unchanged.
pub(crate) fn push_contains_any(
	builder: &mut QueryBuilder<'_, Postgres>,
	columns: &[&str],
	query: &str,
) {
	let query = query.trim();

	if query.is_empty() {
		return;
	}

	builder.push(" AND (");

	for (index, column) in columns.iter().enumerate() {
		if index > 0 {
			builder.push(" OR ");
		}

		builder.push(*column);
		builder.push(" ILIKE ");
		builder.push_bind(format!("%{query}%"));
	}

	builder.push(")");
}

#[cfg(test)]
mod tests {
	use sqlx::{Postgres, QueryBuilder};

	use super::{push_contains_any, ranked_or_plain};
	use crate::Error;

	#[tokio::test]
	async fn ranked_success_skips_the_fallback() {
		let result = ranked_or_plain("test", async { Ok(1) }, || async {
			panic!("fallback must not run");
		})
		.await;

		assert_eq!(result.expect("ranked result"), 1);
	}

	#[tokio::test]
	async fn storage_failure_falls_back_to_plain() {
		let result = ranked_or_plain(
			"test",
			async { Err(Error::Storage { message: "relevance scoring unavailable".to_string() }) },
			|| async { Ok(2) },
		)
		.await;

		assert_eq!(result.expect("plain result"), 2);
	}

	#[tokio::test]
	async fn caller_input_errors_are_not_masked() {
		let result: Result<i32, _> = ranked_or_plain(
			"test",
			async { Err(Error::InvalidRequest { message: "bad sort".to_string() }) },
			|| async { Ok(3) },
		)
		.await;

		assert!(matches!(result, Err(Error::InvalidRequest { .. })));
	}

	#[test]
	fn blank_query_pushes_nothing() {
		let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM plants WHERE TRUE");

		push_contains_any(&mut builder, &["name", "description"], "   ");

		assert_eq!(builder.into_sql(), "SELECT * FROM plants WHERE TRUE");
	}

	#[test]
	fn ors_across_the_column_list() {
		let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM plants WHERE TRUE");

		push_contains_any(&mut builder, &["name", "description", "type"], "mint");

		let sql = builder.into_sql();

		assert!(sql.contains("name ILIKE $1"));
		assert!(sql.contains(" OR description ILIKE $2"));
		assert!(sql.contains(" OR type ILIKE $3"));
		assert!(sql.starts_with("SELECT * FROM plants WHERE TRUE AND ("));
		assert!(sql.ends_with(")"));
	}
}
