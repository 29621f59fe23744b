pub mod business_profile;
pub mod customers;
pub mod health;
pub mod invoices;

pub use business_profile::{
    delete_logo, get_business_profile, get_logo, update_branding, update_business_profile,
    update_invoice_settings,
};
pub use customers::{
    create_customer, delete_customer, get_customer, list_customers, update_customer,
};
pub use health::{health_check, metrics_endpoint, readiness_check};
pub use invoices::{
    create_invoice, delete_invoice, download_invoice_pdf, get_invoice, list_invoices,
    list_invoices_by_customer, update_invoice,
};
