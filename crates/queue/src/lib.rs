//! Background job queue for minds-rs.
//!
//! This crate provides asynchronous job processing using Redis:
//!
//! - **Client**: [`RedisQueueClient`] pushes core queue messages as typed jobs
//! - **Jobs**: confirmation and welcome emails, YouTube imports
//! - **Workers**: the YouTube importer, run with Apalis

pub mod client;
pub mod jobs;
pub mod workers;

pub use client::{RedisQueueClient, RoutedJob};
pub use jobs::*;
pub use workers::*;
