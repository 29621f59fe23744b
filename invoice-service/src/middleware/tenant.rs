//! Tenant context extraction for multi-tenancy support.
//!
//! Tenant and user identifiers arrive as request headers, set by the
//! gateway after it has authenticated the caller. Every data operation in
//! this service is scoped by the extracted tenant id.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use service_core::error::AppError;

/// Tenant context extracted from request headers.
#[derive(Debug, Clone)]
pub struct TenantContext {
    /// Tenant whose data the request operates on
    pub tenant_id: String,
    /// User making the request
    pub user_id: String,
}

impl TenantContext {
    pub fn new(tenant_id: String, user_id: String) -> Self {
        Self { tenant_id, user_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tenant_id = parts
            .headers
            .get("X-Tenant-ID")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(anyhow::anyhow!(
                    "Missing X-Tenant-ID header (required from gateway)"
                ))
            })?;

        let user_id = parts
            .headers
            .get("X-User-ID")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized(anyhow::anyhow!(
                    "Missing X-User-ID header (required from gateway)"
                ))
            })?;

        // Add to tracing span for observability
        let span = tracing::Span::current();
        span.record("tenant_id", tenant_id);
        span.record("user_id", user_id);

        Ok(TenantContext::new(
            tenant_id.to_string(),
            user_id.to_string(),
        ))
    }
}
