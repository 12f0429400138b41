//! Query-string coercion shared by the search endpoints.

use folio_core::search::{
    DEFAULT_RECORD_SIZE, DEFAULT_START, MAX_RECORD_SIZE, SearchQuery, SortDirection, SortKey,
};
use folio_shared::PaginationSummary;
use folio_shared::dto::{PageParams, SearchRequest};

use crate::middleware::error::AppError;

/// Leading-integer parse: optional whitespace and sign, then digits up to the
/// first non-digit. `None` when no digit is found.
fn leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

fn param(raw: &Option<String>) -> Option<i64> {
    raw.as_deref().and_then(leading_int)
}

/// Turn raw query parameters and the optional body into a validated query.
pub fn build_query<S: SortKey>(
    params: &PageParams,
    body: Option<SearchRequest>,
) -> Result<SearchQuery<S>, AppError> {
    let start = param(&params.start)
        .map(|v| v.max(0) as u64)
        .unwrap_or(DEFAULT_START);

    let record_size = match param(&params.record_size) {
        Some(v) if v > 0 => (v as u64).min(MAX_RECORD_SIZE),
        _ => DEFAULT_RECORD_SIZE,
    };

    let direction = param(&params.order_type)
        .map(SortDirection::from_order_type)
        .unwrap_or_default();

    let sort = match params.order_param.as_deref().map(str::trim) {
        None | Some("") => S::DEFAULT,
        Some(name) => S::from_param(name).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid orderParam '{}'; allowed: {}",
                name,
                S::allowed_params()
            ))
        })?,
    };

    let text = body.map(|b| b.search).unwrap_or_default();

    Ok(SearchQuery::new(text)
        .page(start, record_size)
        .sorted_by(sort, direction))
}

/// Decode the optional `{"search": ...}` body. An empty body searches for
/// everything; anything else must be valid JSON.
pub fn search_body(body: &[u8]) -> Result<Option<SearchRequest>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// Pagination summary echoing the normalised query.
pub fn summary<S: SortKey>(query: &SearchQuery<S>, total_records: u64) -> PaginationSummary {
    PaginationSummary {
        total_records,
        start: query.start,
        record_size: query.record_size,
        order_type: query.direction.order_type(),
        order_param: query.sort.param().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::search::{CategorySortField, PostSortField};

    fn params(start: &str, size: &str, order_type: &str, order_param: &str) -> PageParams {
        let opt = |v: &str| (!v.is_empty()).then(|| v.to_string());
        PageParams {
            start: opt(start),
            record_size: opt(size),
            order_type: opt(order_type),
            order_param: opt(order_param),
        }
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("42"), Some(42));
        assert_eq!(leading_int("  7abc"), Some(7));
        assert_eq!(leading_int("-1"), Some(-1));
        assert_eq!(leading_int("+3"), Some(3));
        assert_eq!(leading_int("3.9"), Some(3));
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int("-"), None);
        assert_eq!(leading_int(""), None);
    }

    #[test]
    fn test_defaults() {
        let query = build_query::<PostSortField>(&PageParams::default(), None).unwrap();
        assert_eq!(query.start, 0);
        assert_eq!(query.record_size, 10);
        assert_eq!(query.sort, PostSortField::CreatedAt);
        assert_eq!(query.direction, SortDirection::Ascending);
        assert!(query.text.is_empty());
    }

    #[test]
    fn test_coercion() {
        let query =
            build_query::<CategorySortField>(&params("-5", "0", "-1", "name"), None).unwrap();
        assert_eq!(query.start, 0);
        assert_eq!(query.record_size, 10);
        assert_eq!(query.direction, SortDirection::Descending);
        assert_eq!(query.sort, CategorySortField::Name);

        let query = build_query::<CategorySortField>(&params("x", "5000", "0", ""), None).unwrap();
        assert_eq!(query.start, 0);
        assert_eq!(query.record_size, 100);
        assert_eq!(query.direction, SortDirection::Ascending);
        assert_eq!(query.sort, CategorySortField::CreatedAt);
    }

    #[test]
    fn test_unknown_order_param_is_rejected() {
        let result = build_query::<PostSortField>(&params("", "", "", "password"), None);
        match result {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("postedBy")),
            other => panic!("expected bad request, got {other:?}"),
        }
    }

    #[test]
    fn test_search_body() {
        assert!(search_body(b"").unwrap().is_none());
        assert!(search_body(b"  \n").unwrap().is_none());
        assert_eq!(search_body(br#"{"search":"Rust"}"#).unwrap().unwrap().search, "Rust");
        assert_eq!(search_body(b"{}").unwrap().unwrap().search, "");
        assert!(matches!(search_body(b"{oops"), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_summary_echoes_normalised_values() {
        let body = SearchRequest {
            search: "rust".to_string(),
        };
        let query =
            build_query::<PostSortField>(&params("20", "abc", "-3", "title"), Some(body)).unwrap();
        assert_eq!(query.text, "rust");

        let summary = summary(&query, 42);
        assert_eq!(summary.total_records, 42);
        assert_eq!(summary.start, 20);
        assert_eq!(summary.record_size, 10);
        assert_eq!(summary.order_type, -1);
        assert_eq!(summary.order_param, "title");
    }
}
