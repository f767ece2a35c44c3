//! Taleforge Core — shared domain abstractions.
//!
//! This crate defines the traits and types every bounded context depends on:
//! the error taxonomy, the determinism seams (randomness, time, pacing), the
//! aggregate/event vocabulary, and the ports to the external generation,
//! illustration and speech services. It contains no service clients.

pub mod aggregate;
pub mod contract;
pub mod error;
pub mod event;
pub mod ports;
pub mod rng;
pub mod time;
