pub mod auth;

pub use auth::{authorize, credential_gate, AuthUser, TOKEN_COOKIE};
