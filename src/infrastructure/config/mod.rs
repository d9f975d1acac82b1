//! Infrastructure configuration modules.

pub mod identity;
pub mod logging;
pub mod network;
pub mod settings;
