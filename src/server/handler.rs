// src/server/handler.rs
use hyper::header::{HeaderValue, ACCEPT, ALLOW, CACHE_CONTROL, CONTENT_TYPE};
use hyper::{Body, Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use tower::Service;

use crate::health::{run_checks, HealthCheck, HealthReport, HEALTH_DESCRIPTION, HEALTH_NAME};
use crate::metrics::MetricsRegistry;
use crate::status::{self, BuildInfo};

pub const HEALTH_PATH: &str = "/__health";
pub const GTG_PATH: &str = "/__gtg";
pub const METRICS_PATH: &str = "/__metrics";

const NO_CACHE: &str = "no-cache, no-store, must-revalidate";
const JSON: &str = "application/json; charset=utf-8";
const HTML: &str = "text/html; charset=utf-8";
const TEXT: &str = "text/plain; charset=utf-8";

/// Everything a request needs; built once at startup and never mutated.
pub struct AppState {
    checks: Vec<HealthCheck>,
    metrics: MetricsRegistry,
    build_info: BuildInfo,
}

impl AppState {
    pub fn new(
        checks: Vec<HealthCheck>,
        metrics: MetricsRegistry,
        build_info: BuildInfo,
    ) -> Self {
        Self {
            checks,
            metrics,
            build_info,
        }
    }
}

#[derive(Clone)]
pub struct RequestHandler {
    state: Arc<AppState>,
}

impl RequestHandler {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub async fn handle(&self, req: Request<Body>) -> Response<Body> {
        let method = req.method().clone();
        let path = req.uri().path().to_owned();
        let json = wants_json(&req);
        let route = Route::from_path(&path);

        let response = match route {
            None => respond(StatusCode::NOT_FOUND, TEXT, "Not Found"),
            Some(_) if method != Method::GET && method != Method::HEAD => {
                let mut response =
                    respond(StatusCode::METHOD_NOT_ALLOWED, TEXT, "Method Not Allowed");
                response
                    .headers_mut()
                    .insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
                response
            }
            Some(Route::Health) => self.health(json).await,
            Some(Route::GoodToGo) => self.good_to_go().await,
            Some(Route::Ping) => no_cache(respond(StatusCode::OK, TEXT, status::PONG)),
            Some(Route::BuildInfo) => self.build_info(),
            Some(Route::Metrics) => self.metrics(),
        };

        let label = route.map_or("other", Route::label);
        self.state
            .metrics
            .collector()
            .record_request(label, response.status().as_u16());
        tracing::debug!(
            %method,
            %path,
            status = response.status().as_u16(),
            "request served"
        );
        response
    }

    async fn run(&self) -> HealthReport {
        let collector = self.state.metrics.collector();
        let results = run_checks(&self.state.checks, Some(collector.as_ref())).await;
        HealthReport::new(HEALTH_NAME, HEALTH_DESCRIPTION, results)
    }

    async fn health(&self, json: bool) -> Response<Body> {
        let report = self.run().await;
        if !json {
            return no_cache(respond(StatusCode::OK, HTML, report.to_html()));
        }
        match serde_json::to_vec(&report) {
            Ok(body) => no_cache(respond(StatusCode::OK, JSON, body)),
            Err(err) => {
                tracing::error!(%err, "failed to serialize health report");
                respond(StatusCode::INTERNAL_SERVER_ERROR, TEXT, "Internal Server Error")
            }
        }
    }

    async fn good_to_go(&self) -> Response<Body> {
        let report = self.run().await;
        let status = if report.ok {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        let mut response = Response::new(Body::empty());
        *response.status_mut() = status;
        no_cache(response)
    }

    fn build_info(&self) -> Response<Body> {
        match serde_json::to_vec(&self.state.build_info) {
            Ok(body) => respond(StatusCode::OK, JSON, body),
            Err(err) => {
                tracing::error!(%err, "failed to serialize build info");
                respond(StatusCode::INTERNAL_SERVER_ERROR, TEXT, "Internal Server Error")
            }
        }
    }

    fn metrics(&self) -> Response<Body> {
        match self.state.metrics.gather() {
            Ok(body) => respond(StatusCode::OK, "text/plain; version=0.0.4", body),
            Err(err) => {
                tracing::error!(%err, "failed to encode metrics");
                respond(StatusCode::INTERNAL_SERVER_ERROR, TEXT, "Internal Server Error")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Health,
    GoodToGo,
    Ping,
    BuildInfo,
    Metrics,
}

impl Route {
    fn from_path(path: &str) -> Option<Self> {
        match path {
            HEALTH_PATH => Some(Route::Health),
            GTG_PATH => Some(Route::GoodToGo),
            status::PING_PATH | status::PING_PATH_DW => Some(Route::Ping),
            status::BUILD_INFO_PATH | status::BUILD_INFO_PATH_DW => Some(Route::BuildInfo),
            METRICS_PATH => Some(Route::Metrics),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Route::Health => HEALTH_PATH,
            Route::GoodToGo => GTG_PATH,
            Route::Ping => status::PING_PATH,
            Route::BuildInfo => status::BUILD_INFO_PATH,
            Route::Metrics => METRICS_PATH,
        }
    }
}

fn wants_json(req: &Request<Body>) -> bool {
    req.headers()
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v.contains("application/json"))
}

fn respond(
    status: StatusCode,
    content_type: &'static str,
    body: impl Into<Body>,
) -> Response<Body> {
    let mut response = Response::new(body.into());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn no_cache(mut response: Response<Body>) -> Response<Body> {
    response
        .headers_mut()
        .insert(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE));
    response
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = Infallible;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let handler = self.clone();
        Box::pin(async move { Ok(handler.handle(req).await) })
    }
}
