//! Multi-tenant invoicing service: customers, invoices with atomic
//! sequential numbering and derived totals, business profiles, and PDF
//! export.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
