/// Errors from decoding a compact JWT string.
///
/// Decoding is signature-agnostic: these errors only concern the token's
/// *shape* (segment count, base64url, JSON), never its cryptographic
/// validity.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("segment is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("segment is not a valid JSON object: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`exp` claim is not a number")]
    NonNumericExp,
}

/// Errors from the attach decision for an outgoing request.
///
/// An ineligible route, or a missing token without
/// [`require_token`](crate::JwtConfig::require_token), is *not* an error —
/// both resolve to [`Decision::PassThrough`](crate::Decision::PassThrough).
#[derive(Debug, thiserror::Error)]
pub enum AttachError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("token source yielded no token")]
    NoToken,

    #[error("computed authorization value is not a valid header value")]
    InvalidHeaderValue(#[source] http::header::InvalidHeaderValue),
}
