use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Requested window of a list. Without a `limit` the whole collection is
/// returned, which is what the dashboard pages ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: i64,
    pub limit: Option<i64>,
}

impl Paging {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let limit = limit.map(|limit| limit.clamp(1, MAX_PAGE_SIZE));
        let page = match limit {
            Some(_) => page.unwrap_or(1).max(1),
            None => 1,
        };
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        self.limit.map(|limit| (self.page - 1) * limit).unwrap_or(0)
    }

    pub fn push_to(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        if let Some(limit) = self.limit {
            builder
                .push(" LIMIT ")
                .push_bind(limit)
                .push(" OFFSET ")
                .push_bind(self.offset());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(paging: Paging, total: i64) -> Self {
        let limit = paging.limit.unwrap_or(total);
        let total_pages = if total == 0 || limit == 0 {
            0
        } else {
            (total + limit - 1) / limit
        };

        Self {
            page: paging.page,
            limit,
            total,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, paging: Paging, total: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(paging, total),
        }
    }
}

/// Case-insensitive substring pattern for `ILIKE`, with wildcards in the term escaped
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.trim().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Trimmed search term, `None` when blank
pub fn search_term(search: &Option<String>) -> Option<&str> {
    search.as_deref().map(str::trim).filter(|term| !term.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_defaults_to_whole_collection() {
        let paging = Paging::new(Some(3), None);
        assert_eq!(paging.page, 1);
        assert_eq!(paging.limit, None);
        assert_eq!(paging.offset(), 0);
    }

    #[test]
    fn test_paging_clamps_limit_and_page() {
        let paging = Paging::new(Some(0), Some(500));
        assert_eq!(paging.page, 1);
        assert_eq!(paging.limit, Some(MAX_PAGE_SIZE));

        let paging = Paging::new(Some(3), Some(20));
        assert_eq!(paging.offset(), 40);
    }

    #[test]
    fn test_pagination_meta_total_pages() {
        assert_eq!(PaginationMeta::new(Paging::new(Some(1), Some(10)), 25).total_pages, 3);
        assert_eq!(PaginationMeta::new(Paging::new(None, None), 25).total_pages, 1);
        assert_eq!(PaginationMeta::new(Paging::new(None, None), 0).total_pages, 0);
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(" john "), "%john%");
        assert_eq!(like_pattern("100%_done"), "%100\\%\\_done%");
    }

    #[test]
    fn test_search_term_ignores_blank() {
        assert_eq!(search_term(&Some("   ".to_string())), None);
        assert_eq!(search_term(&Some(" jo ".to_string())), Some("jo"));
        assert_eq!(search_term(&None), None);
    }
}
