//! Signaling: credential acquisition and the offer/answer exchange.
//!
//! [`CredentialBroker`] buys a short-lived bearer credential from the
//! credential endpoint; [`SignalingClient`] owns that credential for the
//! lifetime of one call attempt and drives the one-shot HTTP offer/answer
//! exchange with the call endpoint.

pub mod broker;
pub mod client;

pub use broker::{CredentialBroker, EphemeralToken};
pub use client::{
    SignalingClient, SignalingEvent, SignalingHandler, SignalingMessage, SignalingState,
};
