//! Resource URL composition.

/// Compose an absolute resource URL under the pod base URL.
///
/// Exactly one `/` separates the base from the relative path, whatever the
/// trailing-separator state of the base. When `ensure_trailing_slash` is set
/// the result always ends with `/`, which LDP requires of container URLs; an
/// existing trailing separator is never duplicated.
pub fn resolve(pod_url: &str, resource_path: &str, ensure_trailing_slash: bool) -> String {
    let mut url = String::with_capacity(pod_url.len() + resource_path.len() + 2);
    url.push_str(pod_url);
    if !url.ends_with('/') {
        url.push('/');
    }
    url.push_str(resource_path.trim_start_matches('/'));
    if ensure_trailing_slash && !url.ends_with('/') {
        url.push('/');
    }
    url
}
