//! # Quill Core
//!
//! The domain layer of the Quill blogging backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, ports, validation, the media ingestion policy and the services
//! built on top of them.

pub mod domain;
pub mod error;
pub mod media;
pub mod ports;
pub mod services;
pub mod validation;

pub use error::DomainError;
