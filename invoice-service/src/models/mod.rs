pub mod business_profile;
pub mod counter;
pub mod customer;
pub mod invoice;

pub use business_profile::{
    BrandingSettings, BusinessAddress, BusinessProfile, FontFamily, InvoiceSettings, LogoMetadata,
};
pub use counter::Counter;
pub use customer::{Address, Customer, CustomerStatus};
pub use invoice::{Invoice, InvoiceStatus, LineItem};
