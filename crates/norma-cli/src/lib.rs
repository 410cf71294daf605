//! # Norma CLI
//!
//! Account management and database seeding for Norma AI development and
//! operations.
//!
//! ## Usage
//!
//! ```ignore
//! use norma_cli::{accounts, seeder};
//!
//! accounts::create_or_promote_admin(&pool, &new_account).await?;
//! seeder::seed_legal_updates(&pool, 200).await?;
//! ```

pub mod accounts;
pub mod seeder;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;
