#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Restgate Intermediate Representation (IR)
//!
//! This crate defines the records handed to the generator by the IDL front end:
//! files, services, methods and messages. The generator never parses source
//! syntax; everything it knows about an interface arrives through these types,
//! usually as a JSON [`GenerationRequest`].

pub mod service_ir;

// Re-export the main IR types for convenience
pub use service_ir::*;
