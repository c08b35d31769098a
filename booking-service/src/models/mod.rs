pub mod booking;
pub mod identity;
pub mod service;

pub use booking::Booking;
pub use identity::IdentityClaim;
pub use service::ServiceRecord;
