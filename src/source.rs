use async_trait::async_trait;
use http::Method;

/// Metadata about the outgoing request, handed to [`TokenSource`]s and
/// dynamic [`AuthScheme`](crate::AuthScheme) functions so they can pick a
/// per-request token or scheme.
#[derive(Debug, Clone)]
pub struct RequestMeta {
    /// Full request URL as written by the caller (may be relative).
    pub url: String,
    pub method: Method,
}

impl RequestMeta {
    pub fn new(url: impl Into<String>, method: Method) -> Self {
        Self {
            url: url.into(),
            method,
        }
    }

    /// Capture the metadata of an `http` request.
    pub fn from_request<B>(request: &http::Request<B>) -> Self {
        Self {
            url: request.uri().to_string(),
            method: request.method().clone(),
        }
    }
}

/// Where tokens come from.
///
/// The source is caller-supplied and may be synchronous or asynchronous;
/// call sites always perform one `.await`, which is a no-op for
/// already-resolved values.  `request` is `Some` when called on behalf of
/// an outgoing request, `None` when called from the decode helpers.
///
/// A plain closure is enough for the synchronous case:
///
/// ```rust
/// use jwt_interceptor::{JwtConfig, RequestMeta};
///
/// let config = JwtConfig::new(|_req: Option<&RequestMeta>| {
///     Some("my.jwt.token".to_string())
/// });
/// ```
///
/// Asynchronous sources implement the trait directly:
///
/// ```rust
/// use async_trait::async_trait;
/// use jwt_interceptor::{RequestMeta, TokenSource};
///
/// struct Keychain;
///
/// #[async_trait]
/// impl TokenSource for Keychain {
///     async fn token(&self, _request: Option<&RequestMeta>) -> Option<String> {
///         // e.g. read from secure storage or an IPC channel
///         Some("my.jwt.token".to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Produce a token for this request, or `None` when no token is
    /// available.  An empty string is treated as `None` by callers.
    async fn token(&self, request: Option<&RequestMeta>) -> Option<String>;
}

#[async_trait]
impl<F> TokenSource for F
where
    F: Fn(Option<&RequestMeta>) -> Option<String> + Send + Sync,
{
    async fn token(&self, request: Option<&RequestMeta>) -> Option<String> {
        self(request)
    }
}
