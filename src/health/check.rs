// src/health/check.rs
use super::checker::{Checker, Credentials, HttpChecker};
use super::report::CheckResult;
use crate::config::{join_url, CheckDefinition, ConfigError};
use crate::metrics::MetricsCollector;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Failure of a business function.
pub const BUSINESS_SEVERITY: u8 = 1;

const TECHNICAL_SUMMARY: &str = "See specific service in question for more technical detail";

/// A checker plus the metadata shown to whoever reads the health page.
#[derive(Clone)]
pub struct HealthCheck {
    pub id: String,
    pub name: String,
    pub severity: u8,
    pub business_impact: String,
    pub technical_summary: String,
    pub panic_guide: String,
    checker: Arc<dyn Checker>,
}

impl HealthCheck {
    pub fn new(definition: &CheckDefinition, checker: Arc<dyn Checker>) -> Self {
        let CheckDefinition { id, path } = definition;
        Self {
            id: id.clone(),
            name: format!("Check for url {path}"),
            severity: BUSINESS_SEVERITY,
            business_impact: format!("{id} appears to be failing at url {path}"),
            technical_summary: TECHNICAL_SUMMARY.to_string(),
            panic_guide: format!(
                "Inspect the {id} services in this cluster to find the problem(s)"
            ),
            checker,
        }
    }

    pub async fn run(&self, metrics: Option<&MetricsCollector>) -> CheckResult {
        let start = Instant::now();
        let outcome = self.checker.check().await;
        let elapsed = start.elapsed();

        if let Some(metrics) = metrics {
            metrics.record_check(&self.id, outcome.is_ok(), elapsed);
        }

        match outcome {
            Ok(()) => {
                debug!(check = %self.id, elapsed_ms = elapsed.as_millis() as u64, "check passed");
                CheckResult::passed(self)
            }
            Err(err) => {
                warn!(check = %self.id, %err, "check failed");
                CheckResult::failed(self, err.to_string())
            }
        }
    }
}

/// Turn check definitions into HTTP health checks against `base_url`.
pub fn make_health_checks(
    base_url: &str,
    definitions: &[CheckDefinition],
    credentials: Option<Credentials>,
    client: Client,
) -> Result<Vec<HealthCheck>, ConfigError> {
    definitions
        .iter()
        .map(|definition| {
            let url = join_url(base_url, &definition.path)?;
            let checker = HttpChecker::new(client.clone(), url, credentials.clone());
            Ok(HealthCheck::new(definition, Arc::new(checker)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_checks;

    #[test]
    fn metadata_names_the_failing_service() {
        let definitions = default_checks();
        let checks =
            make_health_checks("http://localhost:1234/", &definitions, None, Client::new())
                .unwrap();

        assert_eq!(checks.len(), 2);
        let lists = &checks[0];
        assert_eq!(lists.id, "lists");
        assert_eq!(
            lists.name,
            "Check for url /__document-store-api/lists/f91b1e6a-5e21-11e6-a72a-bd4bf1198c63"
        );
        assert_eq!(
            lists.business_impact,
            "lists appears to be failing at url /__document-store-api/lists/f91b1e6a-5e21-11e6-a72a-bd4bf1198c63"
        );
        assert_eq!(
            lists.panic_guide,
            "Inspect the lists services in this cluster to find the problem(s)"
        );
        assert_eq!(lists.severity, BUSINESS_SEVERITY);
        assert_eq!(lists.technical_summary, TECHNICAL_SUMMARY);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = make_health_checks("localhost", &default_checks(), None, Client::new());
        assert!(result.is_err());
    }
}
