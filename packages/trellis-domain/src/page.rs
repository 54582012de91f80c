use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SortDirection {
	#[default]
	Asc,
	Desc,
}
impl SortDirection {
	pub fn as_sql(&self) -> &'static str {
		match self {
			Self::Asc => "ASC",
			Self::Desc => "DESC",
		}
	}

	/// Parses `ASC`/`DESC` case-insensitively. `None` or blank means
	/// ascending.
	pub fn parse(raw: Option<&str>) -> Option<Self> {
		let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
			return Some(Self::Asc);
		};

		if raw.eq_ignore_ascii_case("asc") {
			Some(Self::Asc)
		} else if raw.eq_ignore_ascii_case("desc") {
			Some(Self::Desc)
		} else {
			None
		}
	}
}

/// Pagination and ordering for one paged query. `sort` is a caller-supplied
/// column name that every consumer must resolve through its own allowlist
/// before it reaches SQL.
#[derive(Clone, Debug)]
pub struct PageRequest {
	pub page: u32,
	pub size: u32,
	pub sort: Option<String>,
	pub direction: SortDirection,
}
impl PageRequest {
	pub fn offset(&self) -> i64 {
		i64::from(self.page) * i64::from(self.size)
	}
}

#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
	pub items: Vec<T>,
	pub total: i64,
	pub page: u32,
	pub size: u32,
}
impl<T> Page<T> {
	pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
		Page {
			items: self.items.into_iter().map(f).collect(),
			total: self.total,
			page: self.page,
			size: self.size,
		}
	}
}
