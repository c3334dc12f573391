pub mod auth;
pub mod photo;
