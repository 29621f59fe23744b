pub mod business_profile;
pub mod customers;
pub mod invoices;

pub use business_profile::{
    BusinessAddressDto, BusinessProfileResponse, UpdateBrandingRequest,
    UpdateBusinessProfileRequest, UpdateInvoiceSettingsRequest,
};
pub use customers::{AddressDto, CreateCustomerRequest, CustomerResponse, UpdateCustomerRequest};
pub use invoices::{
    CreateInvoiceRequest, InvoiceResponse, LineItemDto, UpdateInvoiceRequest,
};
