//! Core business logic for minds-rs.

pub mod services;

pub use services::*;

#[cfg(test)]
mod test_fixtures;
