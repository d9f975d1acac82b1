//! Identity provider adapters.

pub mod pem;
pub mod record;

pub use pem::PemIdentityProvider;
pub use record::SessionRecord;
