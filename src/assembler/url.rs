//! URL construction from a base URL and query-parameter rows.

use super::error::AssembleError;
use crate::models::QueryParam;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Scheme prefixed to scheme-less URLs so they can be parsed.
const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// `scheme://` at the start of a URL, in any letter case.
static SCHEME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("Failed to compile URL scheme regex")
});

/// Appends enabled query parameters to `url`.
///
/// With no enabled parameters the URL is returned untouched. Otherwise each
/// enabled parameter is form-urlencoded and appended in row order; duplicate
/// keys are all kept. URLs without a `scheme://` prefix are parsed with a
/// temporary `http://` prefix which is removed again from the result.
///
/// # Examples
///
/// ```
/// use rest_workbench::assembler::build_url;
/// use rest_workbench::models::KeyValue;
///
/// let params = vec![KeyValue::new("a", "1"), KeyValue::disabled("b", "2")];
/// assert_eq!(
///     build_url("https://x.test/y", &params).unwrap(),
///     "https://x.test/y?a=1"
/// );
/// ```
pub fn build_url(url: &str, params: &[QueryParam]) -> Result<String, AssembleError> {
    let enabled: Vec<&QueryParam> = params.iter().filter(|p| p.enabled).collect();
    if enabled.is_empty() {
        return Ok(url.to_string());
    }

    let explicit_scheme = has_scheme(url);
    let mut parsed = parse_with_default_scheme(url, explicit_scheme)?;

    {
        let mut pairs = parsed.query_pairs_mut();
        for param in enabled {
            pairs.append_pair(&param.key, &param.value);
        }
    }

    let built = parsed.to_string();
    if explicit_scheme {
        Ok(built)
    } else {
        Ok(built
            .strip_prefix(DEFAULT_SCHEME_PREFIX)
            .unwrap_or(&built)
            .to_string())
    }
}

/// Resolves the URL the transport will actually dial.
///
/// Scheme-less URLs get the default `http://` scheme. Only HTTP and HTTPS are
/// accepted.
pub fn resolve_target(url: &str) -> Result<Url, AssembleError> {
    let parsed = parse_with_default_scheme(url, has_scheme(url))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(AssembleError::UnsupportedScheme(other.to_string())),
    }
}

/// Whether `url` names its own scheme. `host:port/path` does not.
fn has_scheme(url: &str) -> bool {
    SCHEME_REGEX.is_match(url)
}

fn parse_with_default_scheme(url: &str, explicit_scheme: bool) -> Result<Url, AssembleError> {
    let candidate = if explicit_scheme {
        url.to_string()
    } else {
        format!("{}{}", DEFAULT_SCHEME_PREFIX, url)
    };

    Url::parse(&candidate).map_err(|source| AssembleError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}
