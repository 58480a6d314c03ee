pub mod user;
pub mod validation;
