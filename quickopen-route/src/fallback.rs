//! Deterministic generic-search destination used when nothing better exists.

/// Build the "first result" web-search URL for `query`.
///
/// The query is percent-encoded as a single component, so spaces, `&`,
/// `#` and non-ASCII text cannot break out of the `q` parameter.
/// Unlike JavaScript's `encodeURIComponent`, `'`, `(`, `)`, `*` and `!` are
/// escaped too; search engines decode both forms to the same query.
///
/// # Examples
///
/// ```
/// use quickopen_route::fallback::lucky_url;
///
/// assert_eq!(
///     lucky_url("rust async"),
///     "https://www.google.com/search?q=rust%20async&btnI=1"
/// );
/// ```
pub fn lucky_url(query: &str) -> String {
    format!(
        "https://www.google.com/search?q={}&btnI=1",
        urlencoding::encode(query)
    )
}
