//! Cursor-based pagination envelope shared by every paged collection.

use crate::types::PageHRef;

/// Query parameter that carries the page cursor in `next.href`.
pub const START_PARAM: &str = "start";

/// A page of a cursor-paginated collection.
///
/// Every paged response carries `total_count`, `limit`, `first` and an
/// optional `next` link alongside its item array.
pub trait Paginated {
    /// Element type of the page's item array.
    type Item;

    /// Link to the following page, when one exists.
    fn next(&self) -> Option<&PageHRef>;

    /// Consume the page and return its items. Absent arrays yield an empty vec.
    fn into_items(self) -> Vec<Self::Item>;

    /// Cursor for the following page, taken from the `start` query parameter
    /// of `next.href`.
    fn next_start(&self) -> Option<String> {
        self.next()
            .and_then(|next| next.href.as_deref())
            .and_then(start_from_href)
    }
}

/// Extract the `start` query parameter from a page link.
///
/// Returns `None` when the link has no query string or no `start` parameter.
pub fn start_from_href(href: &str) -> Option<String> {
    let (_, query) = href.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == START_PARAM)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_from_href() {
        assert_eq!(start_from_href("https://x/y?start=1"), Some("1".to_string()));
        assert_eq!(
            start_from_href("https://x/y?limit=10&start=abc%3D%3D"),
            Some("abc==".to_string())
        );
        assert_eq!(
            start_from_href("/instances/i/v3/reports?start=xyz#frag"),
            Some("xyz".to_string())
        );
    }

    #[test]
    fn test_start_missing() {
        assert_eq!(start_from_href("https://x/y"), None);
        assert_eq!(start_from_href("https://x/y?limit=10"), None);
    }
}
