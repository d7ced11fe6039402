// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport factory trait definition.
//!
//! A `TransportFactory` hands out fresh transport builders. The client component
//! depends on one being available and wraps it into a pre-configured factory.

/// Produces new transport builders.
///
/// The builder type is left to the implementation; the service layer fixes it to
/// its own client builder.
pub trait TransportFactory: Send + Sync {
    /// The builder handed out by this factory.
    type Builder;

    /// Returns a new builder. Every call yields an independent builder.
    fn new_builder(&self) -> Self::Builder;
}
