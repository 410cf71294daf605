pub mod admin;
pub mod auth;
pub mod documents;
pub mod health;
pub mod jurisdictions;
pub mod legal_updates;
pub mod profile;
pub mod settings;
