use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// One page of a list endpoint.
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A validated page request against a collection of `count` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
}

impl PageRequest {
    /// Reads `?page=`; absent means the first page.
    pub fn from_params(params: &PageParams, size: u32) -> Result<Self, ApiError> {
        let number = match params.page.as_deref() {
            None => 1,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(ApiError::InvalidPage),
            },
        };
        Ok(Self { number, size })
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }

    /// An empty collection still has one (empty) page.
    pub fn page_count(&self, count: i64) -> i64 {
        let size = i64::from(self.size);
        ((count + size - 1) / size).max(1)
    }

    pub fn ensure_exists(&self, count: i64) -> Result<(), ApiError> {
        if i64::from(self.number) > self.page_count(count) {
            Err(ApiError::InvalidPage)
        } else {
            Ok(())
        }
    }

    /// Wraps `results` with links to the neighbouring pages of `list_url`.
    pub fn respond<T>(&self, count: i64, results: Vec<T>, list_url: &str) -> PageResponse<T> {
        let next = (i64::from(self.number) < self.page_count(count))
            .then(|| format!("{list_url}?page={}", self.number + 1));
        let previous = match self.number {
            1 => None,
            2 => Some(list_url.to_owned()),
            n => Some(format!("{list_url}?page={}", n - 1)),
        };
        PageResponse {
            count,
            next,
            previous,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params(page: Option<&str>) -> PageParams {
        PageParams {
            page: page.map(str::to_owned),
        }
    }

    #[rstest]
    #[case(None, Some(1))]
    #[case(Some("3"), Some(3))]
    #[case(Some("0"), None)]
    #[case(Some("-1"), None)]
    #[case(Some("last"), None)]
    fn page_numbers(#[case] raw: Option<&str>, #[case] expected: Option<u32>) {
        let parsed = PageRequest::from_params(&params(raw), 10).ok().map(|p| p.number);
        assert_eq!(parsed, expected);
    }

    #[test]
    fn empty_collection_has_a_first_page() {
        let page = PageRequest { number: 1, size: 10 };
        assert!(page.ensure_exists(0).is_ok());
        let page = PageRequest { number: 2, size: 10 };
        assert!(matches!(page.ensure_exists(0), Err(ApiError::InvalidPage)));
    }

    #[test]
    fn links_to_neighbours() {
        let url = "http://h/snippets/";
        let middle = PageRequest { number: 2, size: 2 }.respond(5, vec![3, 4], url);
        assert_eq!(middle.next.as_deref(), Some("http://h/snippets/?page=3"));
        assert_eq!(middle.previous.as_deref(), Some("http://h/snippets/"));

        let last = PageRequest { number: 3, size: 2 }.respond(5, vec![5], url);
        assert_eq!(last.next, None);
        assert_eq!(last.previous.as_deref(), Some("http://h/snippets/?page=2"));
    }
}
