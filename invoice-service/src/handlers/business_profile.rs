use crate::dtos::{
    BusinessProfileResponse, UpdateBrandingRequest, UpdateBusinessProfileRequest,
    UpdateInvoiceSettingsRequest,
};
use crate::middleware::TenantContext;
use crate::models::BusinessProfile;
use crate::startup::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use validator::Validate;

/// Load the tenant's profile, creating the documented default lazily so
/// invoice settings and branding always have a source.
pub(crate) async fn load_or_create(
    state: &AppState,
    tenant_id: &str,
) -> Result<BusinessProfile, AppError> {
    if let Some(profile) = state.store.get_business_profile(tenant_id).await? {
        return Ok(profile);
    }
    let profile = BusinessProfile::default_for_tenant(tenant_id);
    state.store.upsert_business_profile(&profile).await?;
    tracing::info!("Created default business profile");
    Ok(profile)
}

/// Lazily creates the default profile on first access for a tenant.
#[tracing::instrument(skip(state, tenant), fields(tenant_id = %tenant.tenant_id))]
pub async fn get_business_profile(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let profile = load_or_create(&state, &tenant.tenant_id).await?;
    Ok(Json(BusinessProfileResponse::from(profile)))
}

#[tracing::instrument(skip(state, tenant, request), fields(tenant_id = %tenant.tenant_id))]
pub async fn update_business_profile(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(request): Json<UpdateBusinessProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let mut profile = load_or_create(&state, &tenant.tenant_id).await?;
    if let Some(business_name) = request.business_name {
        profile.business_name = business_name;
    }
    if let Some(address) = request.business_address {
        profile.business_address = address.into();
    }
    if let Some(phone) = request.business_phone {
        profile.business_phone = Some(phone);
    }
    if let Some(email) = request.business_email {
        profile.business_email = Some(email);
    }
    if let Some(tax_id) = request.tax_id {
        profile.tax_id = Some(tax_id);
    }
    if let Some(website) = request.website {
        profile.website = Some(website);
    }
    profile.updated_at = Utc::now();

    state.store.upsert_business_profile(&profile).await?;
    tracing::info!("Updated business profile");

    Ok(Json(BusinessProfileResponse::from(profile)))
}

#[tracing::instrument(skip(state, tenant, request), fields(tenant_id = %tenant.tenant_id))]
pub async fn update_invoice_settings(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(request): Json<UpdateInvoiceSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let mut profile = load_or_create(&state, &tenant.tenant_id).await?;
    if let Some(default_tax_rate) = request.default_tax_rate {
        profile.invoice_settings.default_tax_rate = default_tax_rate;
    }
    if let Some(currency) = request.currency {
        profile.invoice_settings.currency = currency;
    }
    if let Some(payment_terms) = request.payment_terms {
        profile.invoice_settings.payment_terms = payment_terms;
    }
    if let Some(invoice_prefix) = request.invoice_prefix {
        profile.invoice_settings.invoice_prefix = invoice_prefix;
    }
    profile.updated_at = Utc::now();

    state.store.upsert_business_profile(&profile).await?;
    tracing::info!("Updated invoice settings");

    Ok(Json(BusinessProfileResponse::from(profile)))
}

#[tracing::instrument(skip(state, tenant, request), fields(tenant_id = %tenant.tenant_id))]
pub async fn update_branding(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(request): Json<UpdateBrandingRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let mut profile = load_or_create(&state, &tenant.tenant_id).await?;
    if let Some(primary_color) = request.primary_color {
        profile.branding.primary_color = primary_color;
    }
    if let Some(secondary_color) = request.secondary_color {
        profile.branding.secondary_color = secondary_color;
    }
    if let Some(font_family) = request.font_family {
        profile.branding.font_family = font_family;
    }
    profile.updated_at = Utc::now();

    state.store.upsert_business_profile(&profile).await?;
    tracing::info!("Updated branding");

    Ok(Json(BusinessProfileResponse::from(profile)))
}

#[tracing::instrument(skip(state, tenant), fields(tenant_id = %tenant.tenant_id))]
pub async fn get_logo(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let logo = state
        .store
        .get_business_profile(&tenant.tenant_id)
        .await?
        .and_then(|profile| profile.logo)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No logo uploaded")))?;

    let bytes = state.storage.download(&logo.storage_key).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, logo.mime_type),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", logo.filename),
            ),
        ],
        bytes,
    ))
}

#[tracing::instrument(skip(state, tenant), fields(tenant_id = %tenant.tenant_id))]
pub async fn delete_logo(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let mut profile = state
        .store
        .get_business_profile(&tenant.tenant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Business profile not found")))?;
    let logo = profile
        .logo
        .take()
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("No logo uploaded")))?;

    state.storage.delete(&logo.storage_key).await?;
    profile.updated_at = Utc::now();
    state.store.upsert_business_profile(&profile).await?;
    tracing::info!("Deleted logo");

    Ok(StatusCode::NO_CONTENT)
}
