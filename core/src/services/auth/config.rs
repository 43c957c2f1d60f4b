//! Configuration for the authentication service

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// bcrypt work factor for new secret hashes
    pub bcrypt_cost: u32,
    /// Answer verification and reset requests for unknown emails the same
    /// way as for known ones, so callers cannot discover which accounts exist
    pub mask_unknown_accounts: bool,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: 12,
            mask_unknown_accounts: true,
        }
    }
}
