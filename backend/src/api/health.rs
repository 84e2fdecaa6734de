//! Liveness and readiness probes.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, web};

/// Shared readiness flag flipped once the server has finished wiring.
#[derive(Debug, Default)]
pub struct HealthState {
    ready: AtomicBool,
}

impl HealthState {
    /// Create an unready state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service ready to accept traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Liveness probe; answers as soon as the process serves requests.
#[utoipa::path(
    get,
    path = "/healthz/live",
    responses((status = 200, description = "Process is live")),
    tags = ["health"],
    operation_id = "live"
)]
#[get("/live")]
pub async fn live() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Readiness probe; 503 until startup wiring completes.
#[utoipa::path(
    get,
    path = "/healthz/ready",
    responses(
        (status = 200, description = "Ready for traffic"),
        (status = 503, description = "Still starting")
    ),
    tags = ["health"],
    operation_id = "ready"
)]
#[get("/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        HttpResponse::Ok().finish()
    } else {
        HttpResponse::ServiceUnavailable().finish()
    }
}
