//! Configuration for the authentication service

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Minimum accepted password length
    pub min_password_length: usize,
    /// Whether to allow registration of new users
    pub allow_registration: bool,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
            min_password_length: 8,
            allow_registration: true,
        }
    }
}

impl AuthServiceConfig {
    /// Cheapest bcrypt cost, for tests
    pub fn fast_hashing(mut self) -> Self {
        self.bcrypt_cost = 4;
        self
    }
}
