//! # Delivery Feature
//!
//! Per-subscriber batch delivery over an abstract messaging transport.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Transport trait split out so the engine can run without Discord
//! - 1.0.0: Initial release

pub mod engine;
pub mod transport;

pub use engine::{DeliveryEngine, DeliveryOutcome, DeliveryReport};
pub use transport::{Transport, TransportError};
