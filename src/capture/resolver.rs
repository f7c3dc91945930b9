//! Reference resolution against the document base URL.
//!
//! Wraps WHATWG URL joining, the same resolution the browser applies when
//! it reports `img.src` and friends, and classifies the references the
//! capture must never touch: inline `data:`/`blob:` payloads and strings
//! that do not parse.

use thiserror::Error;
use url::Url;

/// Why a reference was excluded from capture.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// `data:` and `blob:` references carry their payload inline; they are
    /// never fetched and stay as-is in the output.
    #[error("unfetchable scheme `{0}:`")]
    UnfetchableScheme(String),
    /// The reference does not parse as a URL against the document base.
    #[error("malformed reference `{reference}`: {source}")]
    Malformed {
        reference: String,
        source: url::ParseError,
    },
}

/// Resolve a possibly-relative reference to an absolute URL.
///
/// Absolute references pass through with WHATWG normalization, so the
/// result matches what the rendered document itself serializes for
/// resolved attributes.
pub fn resolve(reference: &str, base: &Url) -> Result<Url, ResolveError> {
    let resolved = base
        .join(reference)
        .map_err(|source| ResolveError::Malformed {
            reference: reference.to_string(),
            source,
        })?;

    match resolved.scheme() {
        "data" | "blob" => Err(ResolveError::UnfetchableScheme(
            resolved.scheme().to_string(),
        )),
        _ => Ok(resolved),
    }
}
