use crate::models::{Address, Customer, CustomerStatus};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddressDto {
    #[validate(length(min = 1, max = 200, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 100, message = "State is required"))]
    pub state: String,
    #[validate(length(min = 1, max = 20, message = "ZIP code is required"))]
    pub zip_code: String,
    #[validate(length(max = 100, message = "Country must be at most 100 characters"))]
    pub country: Option<String>,
}

impl From<AddressDto> for Address {
    fn from(dto: AddressDto) -> Self {
        Address {
            street: dto.street,
            city: dto.city,
            state: dto.state,
            zip_code: dto.zip_code,
            country: dto.country.unwrap_or_else(|| "USA".to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    #[validate(nested)]
    pub address: AddressDto,
    #[validate(length(max = 100, message = "Company must be at most 100 characters"))]
    pub company: Option<String>,
    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
    pub status: Option<CustomerStatus>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be 2 to 100 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    #[validate(nested)]
    pub address: Option<AddressDto>,
    #[validate(length(max = 100, message = "Company must be at most 100 characters"))]
    pub company: Option<String>,
    #[validate(length(max = 500, message = "Notes must be at most 500 characters"))]
    pub notes: Option<String>,
    pub status: Option<CustomerStatus>,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Address,
    /// Joined single-line address as printed on invoices.
    pub full_address: String,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub status: CustomerStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        let full_address = customer.full_address();
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
            full_address,
            company: customer.company,
            notes: customer.notes,
            status: customer.status,
            created_at: customer.created_at.to_rfc3339(),
            updated_at: customer.updated_at.to_rfc3339(),
        }
    }
}
