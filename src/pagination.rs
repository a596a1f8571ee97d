//! Page-number pagination for list endpoints.
//!
//! Example URLs:
//! - `http://api.example.org/employees/?page=4`
//! - `http://api.example.org/employees/?page=4&page_size=25`
//!
//! The page size comes from configuration. Clients may ask for a different
//! size through `page_size`, clamped to `max_page_size`.

use serde::Serialize;
use thiserror::Error;

/// A paginated list body.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("invalid page {0:?}")]
    InvalidPage(String),
}

#[derive(Debug, Clone)]
pub struct PageNumberPagination {
    pub page_size: usize,
    pub max_page_size: usize,
    pub page_query_param: &'static str,
    pub page_size_query_param: &'static str,
    pub last_page_string: &'static str,
}

impl Default for PageNumberPagination {
    fn default() -> Self {
        Self::new(10)
    }
}

impl PageNumberPagination {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            max_page_size: page_size,
            page_query_param: "page",
            page_size_query_param: "page_size",
            last_page_string: "last",
        }
    }

    pub fn max_page_size(mut self, max: usize) -> Self {
        self.max_page_size = max.max(self.page_size);
        self
    }

    /// Slice `items` into the requested page.
    ///
    /// `params` are the request's query pairs in their original order and
    /// `base_url` the request URL without its query; both feed the
    /// next/previous links.
    pub fn paginate<T>(
        &self,
        items: Vec<T>,
        params: &[(String, String)],
        base_url: &str,
    ) -> Result<PaginatedResponse<T>, PaginationError> {
        let count = items.len();
        let page_size = self.requested_page_size(params);
        // An empty collection still has one (empty) page.
        let total_pages = count.div_ceil(page_size).max(1);

        let page = match lookup(params, self.page_query_param) {
            Some(raw) => self.parse_page_number(raw, total_pages)?,
            None => 1,
        };
        if page > total_pages {
            return Err(PaginationError::InvalidPage(page.to_string()));
        }

        let start = (page - 1) * page_size;
        let results: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

        let next = (page < total_pages).then(|| self.build_url(base_url, params, page + 1));
        let previous = (page > 1).then(|| self.build_url(base_url, params, page - 1));

        Ok(PaginatedResponse {
            count,
            next,
            previous,
            results,
        })
    }

    fn requested_page_size(&self, params: &[(String, String)]) -> usize {
        lookup(params, self.page_size_query_param)
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|size| *size > 0)
            .map_or(self.page_size, |size| size.min(self.max_page_size))
    }

    fn parse_page_number(&self, raw: &str, total_pages: usize) -> Result<usize, PaginationError> {
        let raw = raw.trim();
        if raw == self.last_page_string {
            return Ok(total_pages);
        }
        match raw.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(PaginationError::InvalidPage(raw.to_string())),
        }
    }

    fn build_url(&self, base_url: &str, params: &[(String, String)], page: usize) -> String {
        let mut pairs: Vec<(&str, String)> = params
            .iter()
            .filter(|(key, _)| key != self.page_query_param)
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect();
        // Page 1 is the default, so its link carries no page parameter.
        if page > 1 {
            pairs.push((self.page_query_param, page.to_string()));
        }

        if pairs.is_empty() {
            return base_url.to_string();
        }
        match serde_urlencoded::to_string(&pairs) {
            Ok(query) => format!("{base_url}?{query}"),
            Err(_) => base_url.to_string(),
        }
    }
}

fn lookup<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://testserver/employees/";

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn page_count_is_ceiling_of_count_over_size() {
        let paginator = PageNumberPagination::new(3);
        let items: Vec<i32> = (1..=7).collect();

        let first = paginator.paginate(items.clone(), &[], BASE).unwrap();
        assert_eq!(first.count, 7);
        assert_eq!(first.results, vec![1, 2, 3]);
        assert!(first.previous.is_none());
        assert_eq!(first.next.as_deref(), Some("http://testserver/employees/?page=2"));

        let last = paginator
            .paginate(items.clone(), &params(&[("page", "3")]), BASE)
            .unwrap();
        assert_eq!(last.results, vec![7]);
        assert!(last.next.is_none());
        assert_eq!(last.previous.as_deref(), Some("http://testserver/employees/?page=2"));

        let err = paginator
            .paginate(items, &params(&[("page", "4")]), BASE)
            .unwrap_err();
        assert_eq!(err, PaginationError::InvalidPage("4".into()));
    }

    #[test]
    fn second_page_links_back_to_first_without_page_param() {
        let paginator = PageNumberPagination::new(2);
        let page = paginator
            .paginate(vec![1, 2, 3, 4, 5], &params(&[("page", "2")]), BASE)
            .unwrap();
        assert_eq!(page.previous.as_deref(), Some(BASE));
        assert_eq!(page.next.as_deref(), Some("http://testserver/employees/?page=3"));
    }

    #[test]
    fn empty_collection_has_one_empty_page() {
        let paginator = PageNumberPagination::new(5);
        let page = paginator.paginate(Vec::<i32>::new(), &[], BASE).unwrap();
        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
        assert!(page.next.is_none());
        assert!(page.previous.is_none());

        assert!(paginator
            .paginate(Vec::<i32>::new(), &params(&[("page", "2")]), BASE)
            .is_err());
    }

    #[test]
    fn invalid_page_values_are_rejected() {
        let paginator = PageNumberPagination::new(2);
        for raw in ["0", "-1", "abc", "1.5"] {
            assert!(
                paginator
                    .paginate(vec![1, 2, 3], &params(&[("page", raw)]), BASE)
                    .is_err(),
                "page={raw} should be rejected"
            );
        }
    }

    #[test]
    fn last_selects_final_page() {
        let paginator = PageNumberPagination::new(2);
        let page = paginator
            .paginate(vec![1, 2, 3, 4, 5], &params(&[("page", "last")]), BASE)
            .unwrap();
        assert_eq!(page.results, vec![5]);
    }

    #[test]
    fn page_size_param_is_clamped_to_maximum() {
        let paginator = PageNumberPagination::new(2).max_page_size(4);
        let items: Vec<i32> = (1..=10).collect();

        let page = paginator
            .paginate(items.clone(), &params(&[("page_size", "3")]), BASE)
            .unwrap();
        assert_eq!(page.results, vec![1, 2, 3]);

        let page = paginator
            .paginate(items.clone(), &params(&[("page_size", "50")]), BASE)
            .unwrap();
        assert_eq!(page.results.len(), 4);

        let page = paginator
            .paginate(items, &params(&[("page_size", "zero")]), BASE)
            .unwrap();
        assert_eq!(page.results.len(), 2);
    }

    #[test]
    fn links_keep_other_query_parameters() {
        let paginator = PageNumberPagination::new(1);
        let page = paginator
            .paginate(
                vec!["a", "b"],
                &params(&[("designation", "Software Engineer"), ("page", "1")]),
                BASE,
            )
            .unwrap();
        assert_eq!(
            page.next.as_deref(),
            Some("http://testserver/employees/?designation=Software+Engineer&page=2")
        );
    }
}
