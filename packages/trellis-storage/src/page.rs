use sqlx::{PgPool, Postgres, QueryBuilder, postgres::PgRow};
use trellis_domain::{Page, PageRequest};

use crate::{Error, Result};

/// Runs one paged query: the `select` builder carries the projection and
/// predicates, `count` carries `COUNT(*)` over the same predicates. The sort
/// column must already be resolved through the caller's allowlist; it is
/// interpolated, not bound.
pub async fn fetch_page<T>(
	pool: &PgPool,
	mut select: QueryBuilder<'_, Postgres>,
	mut count: QueryBuilder<'_, Postgres>,
	request: &PageRequest,
	sort_column: &str,
) -> Result<Page<T>>
where
	T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
{
	if request.size == 0 {
		return Err(Error::InvalidArgument("Page size must be greater than zero.".to_string()));
	}

	push_page_clause(&mut select, request, sort_column);

	let items = select.build_query_as::<T>().fetch_all(pool).await?;
	let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

	Ok(Page { items, total, page: request.page, size: request.size })
}

fn push_page_clause(
	builder: &mut QueryBuilder<'_, Postgres>,
	request: &PageRequest,
	sort_column: &str,
) {
	builder.push(" ORDER BY ");
	builder.push(sort_column);
	builder.push(" ");
	builder.push(request.direction.as_sql());
	builder.push(" LIMIT ");
	builder.push_bind(i64::from(request.size));
	builder.push(" OFFSET ");
	builder.push_bind(request.offset());
}
