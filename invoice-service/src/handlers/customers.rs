use crate::dtos::{CreateCustomerRequest, CustomerResponse, UpdateCustomerRequest};
use crate::middleware::TenantContext;
use crate::models::Customer;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use uuid::Uuid;
use validator::Validate;

#[tracing::instrument(skip(state, tenant), fields(tenant_id = %tenant.tenant_id))]
pub async fn list_customers(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let customers = state.store.list_customers(&tenant.tenant_id).await?;
    let response: Vec<CustomerResponse> = customers.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

#[tracing::instrument(skip(state, tenant, request), fields(tenant_id = %tenant.tenant_id))]
pub async fn create_customer(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(request): Json<CreateCustomerRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let now = Utc::now();
    let customer = Customer {
        id: Uuid::new_v4().to_string(),
        tenant_id: tenant.tenant_id,
        name: request.name,
        email: request.email,
        phone: request.phone,
        address: request.address.into(),
        company: request.company,
        notes: request.notes,
        status: request.status.unwrap_or_default(),
        created_at: now,
        updated_at: now,
    };

    state.store.insert_customer(&customer).await?;
    tracing::info!(customer_id = %customer.id, "Created customer");

    Ok((StatusCode::CREATED, Json(CustomerResponse::from(customer))))
}

#[tracing::instrument(skip(state, tenant), fields(tenant_id = %tenant.tenant_id))]
pub async fn get_customer(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state
        .store
        .get_customer(&tenant.tenant_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Customer {} not found", id)))?;
    Ok(Json(CustomerResponse::from(customer)))
}

#[tracing::instrument(skip(state, tenant, request), fields(tenant_id = %tenant.tenant_id))]
pub async fn update_customer(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
    Json(request): Json<UpdateCustomerRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let mut customer = state
        .store
        .get_customer(&tenant.tenant_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Customer {} not found", id)))?;

    if let Some(name) = request.name {
        customer.name = name;
    }
    if let Some(email) = request.email {
        customer.email = email;
    }
    if let Some(phone) = request.phone {
        customer.phone = Some(phone);
    }
    if let Some(address) = request.address {
        customer.address = address.into();
    }
    if let Some(company) = request.company {
        customer.company = Some(company);
    }
    if let Some(notes) = request.notes {
        customer.notes = Some(notes);
    }
    if let Some(status) = request.status {
        customer.status = status;
    }
    customer.updated_at = Utc::now();

    state.store.replace_customer(&customer).await?;
    tracing::info!(customer_id = %customer.id, "Updated customer");

    Ok(Json(CustomerResponse::from(customer)))
}

#[tracing::instrument(skip(state, tenant), fields(tenant_id = %tenant.tenant_id))]
pub async fn delete_customer(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.store.delete_customer(&tenant.tenant_id, &id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Customer {} not found",
            id
        )));
    }
    tracing::info!(customer_id = %id, "Deleted customer");
    Ok(StatusCode::NO_CONTENT)
}
