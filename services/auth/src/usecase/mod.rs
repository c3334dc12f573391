pub mod activation;
pub mod code;
pub mod password_reset;
pub mod photo;
pub mod purge;
pub mod register;
pub mod token;
