//! Trust Module - who skips scanning
//!
//! Static allow-list and institutional TLDs are compiled in; session
//! trust is an explicitly owned store handed to the matcher.

pub mod allowlist;
pub mod matcher;
pub mod session;

#[cfg(test)]
mod tests;

pub use matcher::{base_domain, host_of, DomainTrustMatcher, TrustSource};
pub use session::{SessionTrustStore, TrustEntry};
