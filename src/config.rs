use std::fmt;
use std::sync::Arc;

use http::header::AUTHORIZATION;
use http::{HeaderName, Uri};

use crate::source::{RequestMeta, TokenSource};

/// One entry in the allowlist or denylist.
///
/// Literal entries are matched structurally (see [`JwtInterceptor::is_route_eligible`]
/// for the exact rules); regex entries are always tested against the full
/// request URL.
///
/// [`JwtInterceptor::is_route_eligible`]: crate::JwtInterceptor::is_route_eligible
#[derive(Debug, Clone)]
pub enum RoutePattern {
    Literal(String),
    Regex(regex::Regex),
}

impl From<&str> for RoutePattern {
    fn from(v: &str) -> Self {
        Self::Literal(v.to_owned())
    }
}

impl From<String> for RoutePattern {
    fn from(v: String) -> Self {
        Self::Literal(v)
    }
}

impl From<regex::Regex> for RoutePattern {
    fn from(v: regex::Regex) -> Self {
        Self::Regex(v)
    }
}

impl RoutePattern {
    /// Denylist match against the full URL.
    ///
    /// Literal entries match case-sensitively as a prefix of the URL, with
    /// or without its scheme, so `"example.com/api"` blocks
    /// `"http://example.com/api/things"` too.
    pub(crate) fn matches_route(&self, url: &str) -> bool {
        match self {
            Self::Literal(entry) => {
                url.starts_with(entry.as_str()) || strip_scheme(url).starts_with(entry.as_str())
            }
            Self::Regex(re) => re.is_match(url),
        }
    }

    /// Allowlist match against a parsed absolute URL.
    ///
    /// Literal entries compare against `host[:port]` exactly — an entry
    /// without a port only matches URLs without an explicit port.  An
    /// optional `/path-prefix` after the authority narrows the match to
    /// paths under that prefix.
    pub(crate) fn matches_domain(&self, url: &str, uri: &Uri) -> bool {
        match self {
            Self::Literal(entry) => {
                let (authority, path_prefix) = match entry.find('/') {
                    Some(i) => (&entry[..i], Some(&entry[i..])),
                    None => (entry.as_str(), None),
                };
                let Some(host) = uri.host() else {
                    return false;
                };
                let host_port = match uri.port_u16() {
                    Some(port) => format!("{host}:{port}"),
                    None => host.to_owned(),
                };
                if authority != host_port {
                    return false;
                }
                path_prefix.is_none_or(|prefix| uri.path().starts_with(prefix))
            }
            Self::Regex(re) => re.is_match(url),
        }
    }
}

fn strip_scheme(url: &str) -> &str {
    url.split_once("://").map(|(_, rest)| rest).unwrap_or(url)
}

/// The authorization scheme prefixed to the token.
///
/// Either a fixed string (default `"Bearer "`, trailing space included) or
/// a function computing the prefix from the pending request's metadata.
#[derive(Clone, Default)]
pub enum AuthScheme {
    #[default]
    Bearer,
    Static(String),
    Dynamic(Arc<dyn Fn(&RequestMeta) -> String + Send + Sync>),
}

impl AuthScheme {
    pub fn value(&self, request: &RequestMeta) -> String {
        match self {
            Self::Bearer => "Bearer ".to_owned(),
            Self::Static(scheme) => scheme.clone(),
            Self::Dynamic(f) => f(request),
        }
    }
}

impl From<&str> for AuthScheme {
    fn from(v: &str) -> Self {
        Self::Static(v.to_owned())
    }
}

impl From<String> for AuthScheme {
    fn from(v: String) -> Self {
        Self::Static(v)
    }
}

impl fmt::Debug for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer => f.write_str("Bearer"),
            Self::Static(s) => f.debug_tuple("Static").field(s).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Configuration for token attachment and decoding.
///
/// Built once at application wiring time with [`new`](Self::new) plus the
/// chained setters, then shared read-only (the interceptor and helper wrap
/// it in an `Arc`).
///
/// | Option              | Default           |
/// |---------------------|-------------------|
/// | `header_name`       | `Authorization`   |
/// | `auth_scheme`       | `"Bearer "`       |
/// | `allowed_domains`   | empty             |
/// | `disallowed_routes` | empty             |
/// | `require_token`     | `false`           |
/// | `skip_when_expired` | `false`           |
pub struct JwtConfig {
    /// Caller-supplied token source; see [`TokenSource`].
    pub token_source: Arc<dyn TokenSource>,
    pub header_name: HeaderName,
    pub auth_scheme: AuthScheme,
    /// Allowlist of eligible destinations, compared against `host[:port]`.
    /// When empty, only relative URLs are eligible.
    pub allowed_domains: Vec<RoutePattern>,
    /// Denylist of destinations; takes precedence over the allowlist.
    pub disallowed_routes: Vec<RoutePattern>,
    /// Fail with [`AttachError::NoToken`](crate::AttachError::NoToken)
    /// instead of passing through when the source yields nothing.
    pub require_token: bool,
    /// Pass through instead of attaching a token that is already expired.
    pub skip_when_expired: bool,
}

impl JwtConfig {
    pub fn new(token_source: impl TokenSource + 'static) -> Self {
        Self {
            token_source: Arc::new(token_source),
            header_name: AUTHORIZATION,
            auth_scheme: AuthScheme::default(),
            allowed_domains: Vec::new(),
            disallowed_routes: Vec::new(),
            require_token: false,
            skip_when_expired: false,
        }
    }

    pub fn header_name(mut self, v: HeaderName) -> Self {
        self.header_name = v;
        self
    }

    pub fn auth_scheme(mut self, v: impl Into<AuthScheme>) -> Self {
        self.auth_scheme = v.into();
        self
    }

    /// Compute the scheme per request, e.g. to switch between `Bearer` and
    /// a proprietary prefix depending on the destination.
    pub fn auth_scheme_fn(
        mut self,
        f: impl Fn(&RequestMeta) -> String + Send + Sync + 'static,
    ) -> Self {
        self.auth_scheme = AuthScheme::Dynamic(Arc::new(f));
        self
    }

    pub fn allowed_domains(
        mut self,
        v: impl IntoIterator<Item = impl Into<RoutePattern>>,
    ) -> Self {
        self.allowed_domains = v.into_iter().map(Into::into).collect();
        self
    }

    pub fn disallowed_routes(
        mut self,
        v: impl IntoIterator<Item = impl Into<RoutePattern>>,
    ) -> Self {
        self.disallowed_routes = v.into_iter().map(Into::into).collect();
        self
    }

    pub fn require_token(mut self, v: bool) -> Self {
        self.require_token = v;
        self
    }

    pub fn skip_when_expired(mut self, v: bool) -> Self {
        self.skip_when_expired = v;
        self
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("header_name", &self.header_name)
            .field("auth_scheme", &self.auth_scheme)
            .field("allowed_domains", &self.allowed_domains)
            .field("disallowed_routes", &self.disallowed_routes)
            .field("require_token", &self.require_token)
            .field("skip_when_expired", &self.skip_when_expired)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn literal_domain_matches_host() {
        let p = RoutePattern::from("example.com");
        let url = "http://example.com/api";
        assert!(p.matches_domain(url, &uri(url)));
    }

    #[test]
    fn literal_domain_respects_port() {
        let plain = RoutePattern::from("example.com");
        let with_port = RoutePattern::from("example.com:8080");
        let url = "http://example.com:8080/api";
        assert!(!plain.matches_domain(url, &uri(url)));
        assert!(with_port.matches_domain(url, &uri(url)));

        let url = "http://example.com/api";
        assert!(!with_port.matches_domain(url, &uri(url)));
    }

    #[test]
    fn literal_domain_with_path_prefix() {
        let p = RoutePattern::from("example.com/api");
        let url = "http://example.com/api/things";
        assert!(p.matches_domain(url, &uri(url)));

        let url = "http://example.com/other";
        assert!(!p.matches_domain(url, &uri(url)));
    }

    #[test]
    fn regex_domain_matches_full_url() {
        let p = RoutePattern::from(regex::Regex::new(r"^https?://.*\.example\.com").unwrap());
        let url = "https://api.example.com/v1";
        assert!(p.matches_domain(url, &uri(url)));

        let url = "https://example.org/v1";
        assert!(!p.matches_domain(url, &uri(url)));
    }

    #[test]
    fn literal_route_matches_with_or_without_scheme() {
        let p = RoutePattern::from("example.com/api/private");
        assert!(p.matches_route("http://example.com/api/private"));
        assert!(p.matches_route("example.com/api/private"));

        let p = RoutePattern::from("http://example.com/api/private");
        assert!(p.matches_route("http://example.com/api/private"));
        assert!(p.matches_route("http://example.com/api/private/42"));
        assert!(!p.matches_route("https://example.com/api/private"));
    }

    #[test]
    fn literal_route_is_case_sensitive() {
        let p = RoutePattern::from("example.com/API");
        assert!(!p.matches_route("http://example.com/api"));
    }

    #[test]
    fn regex_route_matches_full_url() {
        let p = RoutePattern::from(regex::Regex::new(r"/admin(/|$)").unwrap());
        assert!(p.matches_route("http://example.com/admin/users"));
        assert!(!p.matches_route("http://example.com/administrate"));
    }

    #[test]
    fn defaults() {
        let config = JwtConfig::new(|_: Option<&RequestMeta>| None);
        assert_eq!(config.header_name, AUTHORIZATION);
        let meta = RequestMeta::new("/x", http::Method::GET);
        assert_eq!(config.auth_scheme.value(&meta), "Bearer ");
        assert!(config.allowed_domains.is_empty());
        assert!(config.disallowed_routes.is_empty());
        assert!(!config.require_token);
        assert!(!config.skip_when_expired);
    }
}
