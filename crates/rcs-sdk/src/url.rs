//! Request URL construction.

use std::borrow::Cow;
use std::collections::BTreeMap;

use reqwest::Url;

use rcs_mapping::{ClassMetadata, Mapping};
use rcs_types::EntityId;

use crate::config::SdkConfig;
use crate::error::{SdkError, SdkResult};

/// Query parameters of a single request.
pub type QueryParams = BTreeMap<String, String>;

/// `path` with a leading `/`.
fn rooted(path: &str) -> Cow<'_, str> {
    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}

/// Whether `path` lies under `prefix`, matching whole segments only.
fn under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => prefix.ends_with('/') || rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Absolute path of a class's collection.
pub fn collection_path(meta: &ClassMetadata) -> String {
    rooted(meta.path_root()).into_owned()
}

/// Absolute path of an entity.
///
/// Identifiers that already are paths (under the mapping's id prefix or
/// under the path root, as hydra IRIs are) are used as is.
pub fn entity_path(mapping: &Mapping, meta: &ClassMetadata, id: &EntityId) -> String {
    let id = id.as_str();
    let root = rooted(meta.path_root());
    let prefix = mapping.id_prefix();
    if (!prefix.is_empty() && under(id, prefix)) || under(id, &root) {
        id.to_string()
    } else {
        format!("{}/{}", root.trim_end_matches('/'), id)
    }
}

/// Absolute URL of `path` with default parameters (when enabled) and `query`.
///
/// On a key collision the request query wins over the defaults.
pub fn build_url(config: &SdkConfig, path: &str, query: &QueryParams) -> SdkResult<Url> {
    let raw = format!("{}{}", config.base_url(), rooted(path));
    let mut url = Url::parse(&raw).map_err(|e| SdkError::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;

    let mut params = BTreeMap::new();
    if config.use_default_parameters {
        params.extend(config.default_parameters.iter());
    }
    params.extend(query.iter());
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}
