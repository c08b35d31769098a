pub mod bookings;
pub mod catalog;
pub mod database;
pub mod metrics;
pub mod token;

pub use bookings::{authorize_booking_listing, BookingService, BookingStore, MongoBookingStore};
pub use catalog::{CatalogPage, CatalogService, CatalogStore, MongoCatalogStore};
pub use database::MongoDb;
pub use metrics::{get_metrics, init_metrics};
pub use token::TokenService;
