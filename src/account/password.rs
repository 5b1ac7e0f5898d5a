use super::store::StoreError;

/// bcrypt password hashing. Verification failures and backend errors both
/// come back as "no match"; a corrupt stored hash is logged.
pub struct Password {
    cost: u32,
}

impl Password {
    pub fn new() -> Self {
        Self { cost: bcrypt::DEFAULT_COST }
    }

    /// Lower cost for tests; DEFAULT_COST makes suites crawl.
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, plain: &str) -> Result<String, StoreError> {
        bcrypt::hash(plain, self.cost).map_err(|e| StoreError::Backend(e.to_string()))
    }

    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        match bcrypt::verify(plain, hash) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!("[account] [password] verify failed: {}", e);
                false
            }
        }
    }
}

impl Default for Password {
    fn default() -> Self {
        Self::new()
    }
}
