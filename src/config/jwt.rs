use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Seconds; 15 minutes unless `JWT_ACCESS_EXPIRATION` says otherwise.
    pub access_token_expiry: u64,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self> {
        let secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable must be set"))?;
        Self::new(secret, env::var("JWT_ACCESS_EXPIRATION").ok().as_deref())
    }

    fn new(secret: String, expiry: Option<&str>) -> Result<Self> {
        if secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters"
            ));
        }

        let access_token_expiry = expiry.and_then(|s| s.parse().ok()).unwrap_or(900);

        Ok(Self {
            secret,
            access_token_expiry,
        })
    }
}
