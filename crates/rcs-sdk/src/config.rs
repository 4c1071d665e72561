use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SdkResult;

/// Where the API lives and how requests are shaped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    pub scheme: String,
    /// Host name of the API.
    pub path: String,
    pub port: Option<u16>,
    /// Path prefix inserted between the host and every request path.
    pub segment: Option<String>,
    /// Scheme of the `Authorization` header.
    pub authorization_type: String,
    pub use_default_parameters: bool,
    /// Query parameters added to every request when
    /// `use_default_parameters` is set.
    pub default_parameters: BTreeMap<String, String>,
    pub unit_of_work_enabled: bool,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            scheme: "https".into(),
            path: String::new(),
            port: None,
            segment: None,
            authorization_type: "Bearer".into(),
            use_default_parameters: true,
            default_parameters: BTreeMap::new(),
            unit_of_work_enabled: true,
        }
    }
}

impl SdkConfig {
    pub fn from_toml_str(input: &str) -> SdkResult<Self> {
        Ok(toml::from_str(input)?)
    }

    /// `scheme://path[:port][segment]`
    pub fn base_url(&self) -> String {
        let mut url = format!("{}://{}", self.scheme, self.path);
        if let Some(port) = self.port {
            url.push_str(&format!(":{port}"));
        }
        if let Some(segment) = &self.segment {
            url.push_str(segment);
        }
        url
    }
}
