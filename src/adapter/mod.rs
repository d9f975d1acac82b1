//! Adapters at the edges of the hexagon.
//!
//! - [`inbound`] - the command-line front end
//! - [`outbound`] - Internet Computer actors and the PEM identity provider

pub mod inbound;
pub mod outbound;
