//! Backend availability probe.

use log::{debug, warn};

use crate::dispatcher::ChatService;

pub const HEALTH_ENDPOINT: &str = "/health";

/// One-shot reachability check against `GET /health`.
///
/// Any 2xx means available. Other statuses and transport errors mean
/// unavailable; the body is never inspected.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthProbe;

impl HealthProbe {
    pub async fn check(&self, service: &ChatService) -> bool {
        match service.backend().get(HEALTH_ENDPOINT).await {
            Ok(reply) if reply.is_success() => {
                debug!("Health check ok ({})", reply.status);
                true
            }
            Ok(reply) => {
                warn!(
                    "Health check failed: {} {}",
                    reply.status, reply.status_text
                );
                false
            }
            Err(e) => {
                warn!("Health check failed: {}", e);
                false
            }
        }
    }
}
