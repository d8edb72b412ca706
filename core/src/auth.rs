//! Bearer-token injection and the unauthenticated-endpoint whitelist.

use crate::endpoints::Endpoints;

/// Path markers of endpoints that must work without a session.
pub const WHITELIST: &[&str] = &["/auth/login", "/auth/register"];

/// True when `path` contains any whitelist marker.
///
/// This is substring containment on the literal path, not route matching:
/// `/v2/auth/login?next=/` is whitelisted too.
pub fn is_whitelisted(path: &str) -> bool {
    WHITELIST.iter().any(|marker| path.contains(marker))
}

/// Whitelisted, or containing the configured login or register path.
pub fn is_public(path: &str, endpoints: &Endpoints) -> bool {
    is_whitelisted(path)
        || [&endpoints.login, &endpoints.register]
            .iter()
            .any(|marker| !marker.is_empty() && path.contains(marker.as_str()))
}

/// Attach `Authorization: Bearer <token>` unless the path is public or
/// there is no token.
pub fn authorize(headers: &mut Vec<(String, String)>, path: &str, token: Option<&str>, endpoints: &Endpoints) {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return;
    };
    if is_public(path, endpoints) {
        return;
    }
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case("authorization"));
    headers.push(("Authorization".to_string(), format!("Bearer {token}")));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_header(headers: &[(String, String)]) -> Option<&str> {
        headers
            .iter()
            .find(|(k, _)| k == "Authorization")
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn whitelist_matches_by_substring() {
        assert!(is_whitelisted("/auth/login"));
        assert!(is_whitelisted("/auth/register"));
        assert!(is_whitelisted("/api/auth/login?redirect=1"));
        assert!(!is_whitelisted("/task/all"));
        assert!(!is_whitelisted("/auth/logout"));
    }

    #[test]
    fn configured_auth_paths_are_public() {
        let endpoints = Endpoints {
            login: "/v2/login".to_string(),
            register: "/v2/signup".to_string(),
            ..Endpoints::default()
        };
        assert!(is_public("/v2/login", &endpoints));
        assert!(is_public("/v2/signup", &endpoints));
        assert!(is_public("/auth/login", &endpoints));
        assert!(!is_public("/task/all", &endpoints));

        let mut headers = Vec::new();
        authorize(&mut headers, "/v2/login", Some("stale"), &endpoints);
        assert!(headers.is_empty());
    }

    #[test]
    fn empty_endpoint_does_not_open_everything() {
        let endpoints = Endpoints {
            register: String::new(),
            ..Endpoints::default()
        };
        assert!(!is_public("/task/all", &endpoints));
    }

    #[test]
    fn token_attached_to_protected_path() {
        let mut headers = Vec::new();
        authorize(&mut headers, "/task/all", Some("abc"), &Endpoints::default());
        assert_eq!(auth_header(&headers), Some("Bearer abc"));
    }

    #[test]
    fn whitelisted_path_gets_no_token() {
        let mut headers = Vec::new();
        authorize(&mut headers, "/auth/login", Some("abc"), &Endpoints::default());
        assert!(headers.is_empty());
    }

    #[test]
    fn missing_or_empty_token_attaches_nothing() {
        let mut headers = Vec::new();
        authorize(&mut headers, "/task/all", None, &Endpoints::default());
        authorize(&mut headers, "/task/all", Some(""), &Endpoints::default());
        assert!(headers.is_empty());
    }

    #[test]
    fn stored_token_replaces_caller_authorization() {
        let mut headers = vec![("authorization".to_string(), "Basic xyz".to_string())];
        authorize(&mut headers, "/task/all", Some("abc"), &Endpoints::default());
        assert_eq!(headers.len(), 1);
        assert_eq!(auth_header(&headers), Some("Bearer abc"));
    }
}
