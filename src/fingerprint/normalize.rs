use crate::FingerprintError;
use url::Url;

/// Query parameters stripped during normalization. Catalog pages reach the
/// same product through campaign links, so these must not affect identity.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "spm",
    "ref",
    "affiliate",
];

/// Normalizes a URL into the canonical form used for fingerprinting
///
/// Two spellings of the same catalog page must normalize identically, or
/// duplicate work slips past admission control. The steps are:
///
/// 1. Parse; reject anything that is not http or https
/// 2. Lowercase the host and strip a leading `www.`
/// 3. Collapse dot segments and duplicate slashes in the path
/// 4. Drop the trailing slash (the root path stays `/`)
/// 5. Drop the fragment
/// 6. Drop tracking query parameters, sort the survivors by key
///
/// # Arguments
///
/// * `raw` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(Url)` - The canonical URL
/// * `Err(FingerprintError)` - The input could not be canonicalized
pub fn normalize_url(raw: &str) -> Result<Url, FingerprintError> {
    let mut url = Url::parse(raw).map_err(|e| FingerprintError::Parse(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(FingerprintError::InvalidScheme(other.to_string())),
    }

    let host = url.host_str().ok_or(FingerprintError::MissingHost)?;
    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    url.set_host(Some(&host))
        .map_err(|e| FingerprintError::Parse(e.to_string()))?;

    let path = canonical_path(url.path());
    url.set_path(&path);

    url.set_fragment(None);

    if url.query().is_some() {
        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        params.sort_by(|a, b| a.0.cmp(&b.0));

        if params.is_empty() {
            url.set_query(None);
        } else {
            let query = params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&query));
        }
    }

    Ok(url)
}

/// Collapses dot segments and duplicate slashes, drops the trailing slash
fn canonical_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
