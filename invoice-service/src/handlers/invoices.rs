use crate::dtos::{CreateInvoiceRequest, InvoiceResponse, UpdateInvoiceRequest};
use crate::middleware::TenantContext;
use crate::models::{Invoice, LineItem};
use crate::services::billing::{build_line_item, invoice_totals, tax_rate_from_percent};
use crate::services::metrics::{INVOICES_TOTAL, INVOICE_AMOUNT_TOTAL, PDF_RENDER_DURATION};
use crate::services::numbering::InvoiceNumberAllocator;
use crate::services::pdf::render_invoice;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Datelike, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use service_core::error::AppError;
use std::time::Instant;
use uuid::Uuid;
use validator::Validate;

#[tracing::instrument(skip(state, tenant), fields(tenant_id = %tenant.tenant_id))]
pub async fn list_invoices(
    State(state): State<AppState>,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    let invoices = state.store.list_invoices(&tenant.tenant_id).await?;
    let response: Vec<InvoiceResponse> = invoices.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

#[tracing::instrument(skip(state, tenant), fields(tenant_id = %tenant.tenant_id))]
pub async fn list_invoices_by_customer(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(customer_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = state
        .store
        .list_invoices_by_customer(&tenant.tenant_id, &customer_id)
        .await?;
    let response: Vec<InvoiceResponse> = invoices.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

#[tracing::instrument(skip(state, tenant, request), fields(tenant_id = %tenant.tenant_id))]
pub async fn create_invoice(
    State(state): State<AppState>,
    tenant: TenantContext,
    Json(request): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let customer = state
        .store
        .get_customer(&tenant.tenant_id, &request.customer_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Customer {} not found", request.customer_id))
        })?;
    let profile = super::business_profile::load_or_create(&state, &tenant.tenant_id).await?;

    // Line totals and invoice totals are always derived here; the request
    // carries no total fields to trust in the first place.
    let items: Vec<LineItem> = request
        .items
        .into_iter()
        .map(|item| build_line_item(item.description, item.quantity, item.unit_price))
        .collect();
    let tax_rate = request
        .tax_rate
        .unwrap_or_else(|| tax_rate_from_percent(profile.invoice_settings.default_tax_rate));
    let totals = invoice_totals(&items, tax_rate);

    let date = request.date.unwrap_or_else(|| Utc::now().date_naive());
    let due_date = request.due_date.unwrap_or(date + Duration::days(30));

    // The counter increment commits before the insert; a failed insert
    // burns the sequence value rather than risking a duplicate number.
    let allocator = InvoiceNumberAllocator::new(state.store.clone());
    let invoice_number = allocator
        .allocate(&profile.invoice_settings.invoice_prefix, date.year())
        .await?;

    let now = Utc::now();
    let invoice = Invoice {
        id: Uuid::new_v4().to_string(),
        tenant_id: tenant.tenant_id,
        invoice_number,
        customer_id: customer.id.clone(),
        customer_name: customer.name.clone(),
        date,
        due_date,
        status: Default::default(),
        items,
        subtotal: totals.subtotal,
        tax_rate,
        tax: totals.tax,
        total: totals.total,
        discount: request.discount,
        notes: request.notes,
        // Snapshots are frozen at creation so later profile or customer
        // edits cannot rewrite history.
        sender_name: request.sender_name.or(Some(profile.business_name.clone())),
        sender_address: request
            .sender_address
            .or_else(|| Some(profile.full_business_address())),
        sender_phone: request.sender_phone.or(profile.business_phone.clone()),
        sender_email: request.sender_email.or(profile.business_email.clone()),
        bill_to_name: request.bill_to_name.or(Some(customer.name.clone())),
        bill_to_address: request.bill_to_address.or(Some(customer.full_address())),
        bill_to_phone: request.bill_to_phone.or(customer.phone.clone()),
        bill_to_email: request.bill_to_email.or(Some(customer.email.clone())),
        created_at: now,
        updated_at: now,
    };

    state.store.insert_invoice(&invoice).await?;
    tracing::info!(
        invoice_id = %invoice.id,
        invoice_number = %invoice.invoice_number,
        total = %invoice.total,
        "Created invoice"
    );

    INVOICES_TOTAL
        .with_label_values(&[invoice.status.as_str()])
        .inc();
    if let Some(amount) = invoice.total.to_f64() {
        INVOICE_AMOUNT_TOTAL
            .with_label_values(&[&profile.invoice_settings.currency])
            .inc_by(amount);
    }

    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(invoice))))
}

#[tracing::instrument(skip(state, tenant), fields(tenant_id = %tenant.tenant_id))]
pub async fn get_invoice(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state
        .store
        .get_invoice(&tenant.tenant_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice {} not found", id)))?;
    Ok(Json(InvoiceResponse::from(invoice)))
}

#[tracing::instrument(skip(state, tenant, request), fields(tenant_id = %tenant.tenant_id))]
pub async fn update_invoice(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
    Json(request): Json<UpdateInvoiceRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let mut invoice = state
        .store
        .get_invoice(&tenant.tenant_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice {} not found", id)))?;

    let items_changed = request.items.is_some();
    let rate_changed = request.tax_rate.is_some();

    if let Some(status) = request.status {
        invoice.status = status;
    }
    if let Some(due_date) = request.due_date {
        invoice.due_date = due_date;
    }
    if let Some(items) = request.items {
        invoice.items = items
            .into_iter()
            .map(|item| build_line_item(item.description, item.quantity, item.unit_price))
            .collect();
    }
    if let Some(tax_rate) = request.tax_rate {
        invoice.tax_rate = tax_rate;
    }
    if let Some(discount) = request.discount {
        invoice.discount = Some(discount);
    }
    if let Some(notes) = request.notes {
        invoice.notes = Some(notes);
    }

    // Totals only move when their inputs moved; a status-only update
    // leaves the stored figures untouched.
    if items_changed || rate_changed {
        let totals = invoice_totals(&invoice.items, invoice.tax_rate);
        invoice.subtotal = totals.subtotal;
        invoice.tax = totals.tax;
        invoice.total = totals.total;
    }
    invoice.updated_at = Utc::now();

    state.store.replace_invoice(&invoice).await?;
    tracing::info!(invoice_id = %invoice.id, "Updated invoice");

    Ok(Json(InvoiceResponse::from(invoice)))
}

#[tracing::instrument(skip(state, tenant), fields(tenant_id = %tenant.tenant_id))]
pub async fn delete_invoice(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.store.delete_invoice(&tenant.tenant_id, &id).await?;
    if !deleted {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "Invoice {} not found",
            id
        )));
    }
    tracing::info!(invoice_id = %id, "Deleted invoice");
    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip(state, tenant), fields(tenant_id = %tenant.tenant_id))]
pub async fn download_invoice_pdf(
    State(state): State<AppState>,
    tenant: TenantContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = state
        .store
        .get_invoice(&tenant.tenant_id, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice {} not found", id)))?;

    // Customer and profile only enrich the document; a render must not
    // fail because either went missing after the invoice was created.
    let customer = state
        .store
        .get_customer(&tenant.tenant_id, &invoice.customer_id)
        .await?;
    let profile = state.store.get_business_profile(&tenant.tenant_id).await?;
    let logo_bytes = match profile.as_ref().and_then(|p| p.logo.as_ref()) {
        Some(logo) => match state.storage.download(&logo.storage_key).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("Stored logo could not be read, rendering placeholder: {}", e);
                None
            }
        },
        None => None,
    };

    let invoice_number = invoice.invoice_number.clone();
    let start = Instant::now();
    // Rendering is CPU-bound (font layout, image decoding); keep it off
    // the request event loop.
    let result = tokio::task::spawn_blocking(move || {
        render_invoice(
            &invoice,
            customer.as_ref(),
            profile.as_ref(),
            logo_bytes.as_deref(),
        )
    })
    .await
    .map_err(|e| AppError::RenderFailed(anyhow::anyhow!("Render task panicked: {}", e)))?;

    let outcome = if result.is_ok() { "success" } else { "error" };
    PDF_RENDER_DURATION
        .with_label_values(&[outcome])
        .observe(start.elapsed().as_secs_f64());
    let bytes = result?;

    tracing::info!(
        invoice_number = %invoice_number,
        size = bytes.len(),
        "Rendered invoice PDF"
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"invoice-{}.pdf\"", invoice_number),
            ),
        ],
        bytes,
    ))
}
