use crate::models::{
    BrandingSettings, BusinessAddress, BusinessProfile, FontFamily, InvoiceSettings, LogoMetadata,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn validate_percent(value: &Decimal) -> Result<(), ValidationError> {
    if *value >= Decimal::ZERO && *value <= Decimal::ONE_HUNDRED {
        Ok(())
    } else {
        Err(validation_error(
            "percent",
            "tax rate must be a percentage between 0 and 100",
        ))
    }
}

fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err(validation_error(
            "hex_color",
            "color must be a #RRGGBB hex value",
        ))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BusinessAddressDto {
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

impl From<BusinessAddressDto> for BusinessAddress {
    fn from(dto: BusinessAddressDto) -> Self {
        BusinessAddress {
            street: dto.street,
            city: dto.city,
            state: dto.state,
            zip_code: dto.zip_code,
            country: dto.country.unwrap_or_else(|| "USA".to_string()),
        }
    }
}

/// Partial profile update; absent fields keep their stored values.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBusinessProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Business name must be 1 to 100 characters"))]
    pub business_name: Option<String>,
    #[validate(nested)]
    pub business_address: Option<BusinessAddressDto>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub business_phone: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub business_email: Option<String>,
    #[validate(length(max = 50, message = "Tax id must be at most 50 characters"))]
    pub tax_id: Option<String>,
    #[validate(length(max = 200, message = "Website must be at most 200 characters"))]
    pub website: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateInvoiceSettingsRequest {
    /// Percent, 0 to 100.
    #[validate(custom(function = "validate_percent"))]
    pub default_tax_rate: Option<Decimal>,
    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter code"))]
    pub currency: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Payment terms must be 1 to 50 characters"))]
    pub payment_terms: Option<String>,
    #[validate(length(min = 1, max = 10, message = "Invoice prefix must be 1 to 10 characters"))]
    pub invoice_prefix: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBrandingRequest {
    #[validate(custom(function = "validate_hex_color"))]
    pub primary_color: Option<String>,
    #[validate(custom(function = "validate_hex_color"))]
    pub secondary_color: Option<String>,
    pub font_family: Option<FontFamily>,
}

#[derive(Debug, Serialize)]
pub struct BusinessProfileResponse {
    pub business_name: String,
    pub business_address: BusinessAddress,
    /// Joined single-line address as printed on invoices.
    pub full_business_address: String,
    pub business_phone: Option<String>,
    pub business_email: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
    pub logo: Option<LogoMetadata>,
    pub invoice_settings: InvoiceSettings,
    pub branding: BrandingSettings,
    pub created_at: String,
    pub updated_at: String,
}

impl From<BusinessProfile> for BusinessProfileResponse {
    fn from(profile: BusinessProfile) -> Self {
        let full_business_address = profile.full_business_address();
        Self {
            business_name: profile.business_name,
            business_address: profile.business_address,
            full_business_address,
            business_phone: profile.business_phone,
            business_email: profile.business_email,
            tax_id: profile.tax_id,
            website: profile.website,
            logo: profile.logo,
            invoice_settings: profile.invoice_settings,
            branding: profile.branding,
            created_at: profile.created_at.to_rfc3339(),
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}
