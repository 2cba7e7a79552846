// src/health/report.rs
use super::check::HealthCheck;
use crate::metrics::MetricsCollector;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

pub const SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub name: String,
    pub ok: bool,
    pub severity: u8,
    pub business_impact: String,
    pub technical_summary: String,
    pub panic_guide: String,
    pub check_output: String,
    pub last_updated: String,
}

impl CheckResult {
    pub fn passed(check: &HealthCheck) -> Self {
        Self::from_check(check, true, String::new())
    }

    pub fn failed(check: &HealthCheck, output: String) -> Self {
        Self::from_check(check, false, output)
    }

    fn from_check(check: &HealthCheck, ok: bool, check_output: String) -> Self {
        Self {
            name: check.name.clone(),
            ok,
            severity: check.severity,
            business_impact: check.business_impact.clone(),
            technical_summary: check.technical_summary.clone(),
            panic_guide: check.panic_guide.clone(),
            check_output,
            last_updated: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub schema_version: u8,
    pub name: String,
    pub description: String,
    pub checks: Vec<CheckResult>,
    pub ok: bool,
    /// Most severe (lowest) severity among failing checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<u8>,
}

impl HealthReport {
    pub fn new(name: &str, description: &str, checks: Vec<CheckResult>) -> Self {
        let ok = checks.iter().all(|c| c.ok);
        let severity = checks.iter().filter(|c| !c.ok).map(|c| c.severity).min();
        Self {
            schema_version: SCHEMA_VERSION,
            name: name.to_string(),
            description: description.to_string(),
            checks,
            ok,
            severity,
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let status = if self.ok { "OK" } else { "FAILING" };
        html.push_str(&format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{name}</title></head>\n<body>\n\
             <h1>{name}</h1>\n<p>{description}</p>\n<p>Overall status: <strong>{status}</strong></p>\n\
             <table border=\"1\">\n<tr><th>Name</th><th>OK</th><th>Severity</th><th>Business impact</th>\
             <th>Technical summary</th><th>Panic guide</th><th>Output</th><th>Last updated</th></tr>\n",
            name = escape(&self.name),
            description = escape(&self.description),
        ));
        for check in &self.checks {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape(&check.name),
                check.ok,
                check.severity,
                escape(&check.business_impact),
                escape(&check.technical_summary),
                escape(&check.panic_guide),
                escape(&check.check_output),
                escape(&check.last_updated),
            ));
        }
        html.push_str("</table>\n</body>\n</html>\n");
        html
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Run every check concurrently, results in configuration order.
pub async fn run_checks(
    checks: &[HealthCheck],
    metrics: Option<&MetricsCollector>,
) -> Vec<CheckResult> {
    let results =
        futures::future::join_all(checks.iter().map(|check| check.run(metrics))).await;

    if let Some(metrics) = metrics {
        let passing = results.iter().filter(|r| r.ok).count();
        metrics.update_check_counts(passing, results.len());
    }
    results
}
