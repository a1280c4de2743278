//! Adapters Layer
//!
//! Outbound adapters implementing the domain ports against real systems.

pub mod outbound;
