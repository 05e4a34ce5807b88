pub mod availability;
pub mod provider;
pub mod title;

pub use availability::{
    AvailabilityRecord, AvailabilitySource, Offer, OfferKind, ProviderMatch,
    AVAILABILITY_ATTRIBUTION,
};
pub use provider::ProviderDescriptor;
pub use title::{MediaType, Title, TitleLookup};
