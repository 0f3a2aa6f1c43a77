use url::Url;

/// Extracts the authority (`host` or `host:port`) from a URL
///
/// The host is lowercased. A port is only included when it is explicit and
/// not the scheme's default, so `http://a.com` and `https://a.com` share an
/// authority.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use page_weight::url::extract_authority;
///
/// let url = Url::parse("https://Example.com/path").unwrap();
/// assert_eq!(extract_authority(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_authority(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Returns true if `resource` lives on a different authority than `document`
pub fn is_external(document: &Url, resource: &Url) -> bool {
    extract_authority(document) != extract_authority(resource)
}
