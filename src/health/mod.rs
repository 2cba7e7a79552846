// src/health/mod.rs
mod check;
mod checker;
mod report;

pub use check::{make_health_checks, HealthCheck, BUSINESS_SEVERITY};
pub use checker::{check_http_ok, CheckError, Checker, Credentials, HttpChecker};
pub use report::{run_checks, CheckResult, HealthReport, SCHEMA_VERSION};

pub const HEALTH_NAME: &str = "Public API Checker healthchecks";
pub const HEALTH_DESCRIPTION: &str = "Checks for accessing public API endpoints";
