//! Health endpoints: liveness and readiness probes for orchestration.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

/// Readiness and liveness flags shared with the probe handlers.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Start not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the server as bound and accepting traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail liveness probes, for example while draining.
    pub fn mark_unhealthy(&self) {
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe. Returns 503 once the process is marked unhealthy.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use rstest::rstest;

    #[rstest]
    #[actix_web::test]
    async fn readiness_follows_state() {
        let state = web::Data::new(HealthState::new());
        let app = test::init_service(App::new().app_data(state.clone()).service(ready)).await;

        let before = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;
        assert_eq!(before.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.mark_ready();
        let after = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;
        assert_eq!(after.status(), StatusCode::OK);
        assert_eq!(
            after.headers().get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn liveness_fails_once_unhealthy() {
        let state = web::Data::new(HealthState::new());
        let app = test::init_service(App::new().app_data(state.clone()).service(live)).await;

        let alive = test::call_service(&app, test::TestRequest::get().uri("/health/live").to_request()).await;
        assert_eq!(alive.status(), StatusCode::OK);

        state.mark_unhealthy();
        let draining = test::call_service(&app, test::TestRequest::get().uri("/health/live").to_request()).await;
        assert_eq!(draining.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
