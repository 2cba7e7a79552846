// src/status/mod.rs
//! Standard ping and build-info payloads shared by every service.
use serde::Serialize;

pub const PING_PATH: &str = "/__ping";
pub const PING_PATH_DW: &str = "/ping";
pub const BUILD_INFO_PATH: &str = "/__build-info";
pub const BUILD_INFO_PATH_DW: &str = "/build-info";

pub const PONG: &str = "pong";

/// Build metadata. Revision, builder and build time are baked in at
/// compile time from `BUILD_REVISION`, `BUILD_BUILDER` and `BUILD_DATE_TIME`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub version: String,
    pub repository: String,
    pub revision: String,
    pub builder: String,
    pub date_time: String,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            repository: env!("CARGO_PKG_REPOSITORY").to_string(),
            revision: option_env!("BUILD_REVISION").unwrap_or_default().to_string(),
            builder: option_env!("BUILD_BUILDER").unwrap_or_default().to_string(),
            date_time: option_env!("BUILD_DATE_TIME").unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_info_uses_package_metadata() {
        let info = BuildInfo::current();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));

        let json = serde_json::to_value(&info).unwrap();
        for key in ["version", "repository", "revision", "builder", "dateTime"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
