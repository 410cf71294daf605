//! Database seeding for local development.

pub mod legal_updates;
pub mod models;

pub use legal_updates::{
    clear_legal_updates, generate_legal_updates, insert_legal_updates_batch, seed_legal_updates,
};
pub use models::{LegalUpdateSeed, SEED_SOURCE};
