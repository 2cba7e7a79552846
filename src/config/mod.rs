// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

const DEFAULT_CHECKS: &[(&str, &str)] = &[
    (
        "lists",
        "/__document-store-api/lists/f91b1e6a-5e21-11e6-a72a-bd4bf1198c63",
    ),
    (
        "content",
        "/__document-store-api/content/bd1cecf2-893e-11e6-8cb7-e7ada1d123b1",
    ),
];

/// The business level endpoints checked when no checks file is given.
pub fn default_checks() -> Vec<CheckDefinition> {
    DEFAULT_CHECKS
        .iter()
        .map(|(id, path)| CheckDefinition::new(*id, *path))
        .collect()
}

/// Load the list of checks from a file (YAML or JSON)
pub async fn load_checks<P: AsRef<Path>>(path: P) -> Result<Vec<CheckDefinition>> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read checks file {}", path.display()))?;

    let file: ChecksFile = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&contents).context("Failed to parse YAML checks file")?
        }
        _ => serde_json::from_str(&contents).context("Failed to parse JSON checks file")?,
    };

    validate_checks(&file.checks)?;
    Ok(file.checks)
}

pub fn validate_checks(checks: &[CheckDefinition]) -> Result<(), ConfigError> {
    if checks.is_empty() {
        return Err(ConfigError::NoChecks);
    }

    let mut seen = HashSet::new();
    for (index, check) in checks.iter().enumerate() {
        if check.id.trim().is_empty() {
            return Err(ConfigError::InvalidCheck {
                index,
                reason: "empty id",
            });
        }
        if check.path.trim().is_empty() {
            return Err(ConfigError::InvalidCheck {
                index,
                reason: "empty path",
            });
        }
        if !seen.insert(check.id.as_str()) {
            return Err(ConfigError::DuplicateCheck(check.id.clone()));
        }
    }
    Ok(())
}

pub fn parse_base_url(base_url: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(base_url).map_err(|source| ConfigError::InvalidBaseUrl {
        url: base_url.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

/// Append `path` to `base_url` with exactly one `/` between them.
///
/// Plain concatenation rather than [`Url::join`], so a base URL carrying a
/// path prefix (a proxy mount point, say) keeps it.
pub fn join_url(base_url: &str, path: &str) -> Result<Url, ConfigError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    parse_base_url(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use proptest::prelude::*;
    use std::io::Write;

    #[test]
    fn default_checks_cover_lists_and_content() {
        let checks = default_checks();
        let ids: Vec<_> = checks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["lists", "content"]);
        assert!(checks
            .iter()
            .all(|c| c.path.starts_with("/__document-store-api/")));
        assert!(validate_checks(&checks).is_ok());
    }

    #[test]
    fn join_url_collapses_slashes() {
        let url = join_url("http://localhost:1234/", "/__document-store-api/lists/1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/__document-store-api/lists/1");

        let url = join_url("http://localhost:1234", "content/2").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1234/content/2");
    }

    #[test]
    fn join_url_keeps_base_path_prefix() {
        let url = join_url("https://api.example.com/gateway/", "/lists/1").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/gateway/lists/1");
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(matches!(
            parse_base_url("ftp://example.com/"),
            Err(ConfigError::UnsupportedScheme(s)) if s == "ftp"
        ));
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn cli_flags_are_parsed() {
        let config = Config::try_parse_from([
            "public-api-checker",
            "--port",
            "9090",
            "--baseurl",
            "http://vulcand:8080/",
            "--user",
            "ops",
            "--password",
            "secret",
        ])
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.base_url, "http://vulcand:8080/");
        assert_eq!(config.user, "ops");
        assert!(config.validate().is_ok());
        assert!(config.credentials().is_some());
    }

    #[test]
    fn empty_user_means_no_credentials() {
        let config = Config::try_parse_from(["public-api-checker", "--user", ""]).unwrap();
        assert!(config.credentials().is_none());
    }

    #[test]
    fn validation_rejects_bad_lists() {
        assert!(matches!(validate_checks(&[]), Err(ConfigError::NoChecks)));
        assert!(matches!(
            validate_checks(&[CheckDefinition::new("", "/x")]),
            Err(ConfigError::InvalidCheck { index: 0, .. })
        ));
        assert!(matches!(
            validate_checks(&[CheckDefinition::new("a", "/x"), CheckDefinition::new("b", " ")]),
            Err(ConfigError::InvalidCheck { index: 1, .. })
        ));
        assert!(matches!(
            validate_checks(&[CheckDefinition::new("a", "/x"), CheckDefinition::new("a", "/y")]),
            Err(ConfigError::DuplicateCheck(id)) if id == "a"
        ));
    }

    #[tokio::test]
    async fn loads_yaml_checks_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "checks:\n  - id: people\n    path: /__people-api/people/1\n  - id: orgs\n    path: /__orgs-api/orgs/2"
        )
        .unwrap();

        let checks = load_checks(file.path()).await.unwrap();
        assert_eq!(
            checks,
            vec![
                CheckDefinition::new("people", "/__people-api/people/1"),
                CheckDefinition::new("orgs", "/__orgs-api/orgs/2"),
            ]
        );
    }

    #[tokio::test]
    async fn loads_json_checks_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"checks":[{{"id":"lists","path":"/lists/1"}}]}}"#).unwrap();

        let checks = load_checks(file.path()).await.unwrap();
        assert_eq!(checks, vec![CheckDefinition::new("lists", "/lists/1")]);
    }

    #[tokio::test]
    async fn rejects_empty_checks_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"checks":[]}}"#).unwrap();

        assert!(load_checks(file.path()).await.is_err());
        assert!(load_checks("/nonexistent/checks.yaml").await.is_err());
    }

    proptest! {
        #[test]
        fn joined_url_has_single_separator(
            leading in 0usize..4,
            trailing in 0usize..4,
            segment in "[a-z0-9]{1,12}",
        ) {
            let base = format!("http://localhost:1234{}", "/".repeat(trailing));
            let path = format!("{}{}", "/".repeat(leading), segment);
            let url = join_url(&base, &path).unwrap();
            prop_assert_eq!(url.path(), format!("/{}", segment));
        }
    }
}
