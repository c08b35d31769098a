pub mod auth;
pub mod bookings;
pub mod health;
pub mod services;

pub use auth::issue_access_token;
pub use bookings::{cancel_booking, create_booking, list_bookings};
pub use health::{health_check, metrics, root};
pub use services::{get_service, list_services};
