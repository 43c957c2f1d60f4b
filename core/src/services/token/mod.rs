//! Session token signing
//!
//! Login hands out a signed JWT carrying the subject's identity and roles;
//! request guards call back into [`TokenSignerTrait::verify`].

mod config;
mod signer;

#[cfg(test)]
mod tests;

pub use config::TokenSignerConfig;
pub use signer::{JwtTokenSigner, TokenSignerTrait};
