//! Business profile model: issuer identity, invoice settings, and branding
//! for one tenant.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(default = "super::customer::default_country")]
    pub country: String,
}

/// Metadata for a stored logo file. The bytes live under the storage
/// backend at `storage_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoMetadata {
    pub filename: String,
    pub mime_type: String,
    pub size: i64,
    pub storage_key: String,
}

/// Font families a tenant can pick for invoice documents. Families that
/// have no built-in PDF equivalent render as their closest match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFamily {
    Helvetica,
    Arial,
    #[serde(rename = "Times New Roman")]
    TimesNewRoman,
    Georgia,
    Verdana,
}

impl Default for FontFamily {
    fn default() -> Self {
        FontFamily::Helvetica
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceSettings {
    /// Percent, 0 to 100. Converted to a fraction when an invoice is
    /// created.
    pub default_tax_rate: Decimal,
    pub currency: String,
    pub payment_terms: String,
    pub invoice_prefix: String,
}

impl Default for InvoiceSettings {
    fn default() -> Self {
        Self {
            default_tax_rate: Decimal::new(10, 0),
            currency: "USD".to_string(),
            payment_terms: "Net 30".to_string(),
            invoice_prefix: "INV".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandingSettings {
    pub primary_color: String,
    pub secondary_color: String,
    pub font_family: FontFamily,
}

impl Default for BrandingSettings {
    fn default() -> Self {
        Self {
            primary_color: "#F97316".to_string(),
            secondary_color: "#1e293b".to_string(),
            font_family: FontFamily::Helvetica,
        }
    }
}

/// One profile per tenant, keyed by tenant id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    #[serde(rename = "_id")]
    pub tenant_id: String,
    pub business_name: String,
    pub business_address: BusinessAddress,
    pub business_phone: Option<String>,
    pub business_email: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
    pub logo: Option<LogoMetadata>,
    #[serde(default)]
    pub invoice_settings: InvoiceSettings,
    #[serde(default)]
    pub branding: BrandingSettings,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl BusinessProfile {
    /// Placeholder profile created lazily on first access for a tenant.
    pub fn default_for_tenant(tenant_id: &str) -> Self {
        let now = Utc::now();
        Self {
            tenant_id: tenant_id.to_string(),
            business_name: "Your Business Name".to_string(),
            business_address: BusinessAddress {
                street: "Your Business Address".to_string(),
                city: "City".to_string(),
                state: "State".to_string(),
                zip_code: "12345".to_string(),
                country: "USA".to_string(),
            },
            business_phone: None,
            business_email: None,
            tax_id: None,
            website: None,
            logo: None,
            invoice_settings: InvoiceSettings::default(),
            branding: BrandingSettings::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Single-line mailing address including the country, as printed on
    /// invoices.
    pub fn full_business_address(&self) -> String {
        format!(
            "{}, {}, {} {}, {}",
            self.business_address.street,
            self.business_address.city,
            self.business_address.state,
            self.business_address.zip_code,
            self.business_address.country
        )
    }
}
