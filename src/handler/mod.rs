pub mod auth;
pub mod properties;
pub mod reports;
pub mod settings;
pub mod users;
