//! Common utilities and shared types for minds-rs.
//!
//! This crate provides foundational components used across all minds-rs crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Random codes**: Alphanumeric confirmation codes via [`IdGenerator`]
//! - **Signed tokens**: HS256 JWT encode/decode via [`Jwt`]
//!
//! # Example
//!
//! ```no_run
//! use minds_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let code = id_gen.random_string(16);
//!     println!("Generated code {code} for {}", config.server.url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod jwt;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use jwt::Jwt;
