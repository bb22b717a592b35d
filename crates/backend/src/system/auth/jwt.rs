use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::auth::TokenClaims;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

use crate::store::Account;

/// Signing key and token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    secret: String,
    lifetime_hours: i64,
}

impl JwtKeys {
    /// Uses `secret`, or a generated one when it is empty. Generated
    /// secrets do not survive a restart.
    pub fn new(secret: &str, lifetime_hours: i64) -> Self {
        let secret = if secret.trim().is_empty() {
            tracing::warn!("No JWT secret configured, generating one for this run");
            generate_jwt_secret()
        } else {
            secret.to_string()
        };
        Self {
            secret,
            lifetime_hours,
        }
    }

    /// Generate JWT access token for an account
    pub fn generate_access_token(&self, account: &Account) -> Result<String> {
        let now = Utc::now();
        let exp = (now + chrono::Duration::hours(self.lifetime_hours)).timestamp() as usize;
        let iat = now.timestamp() as usize;

        let claims = TokenClaims {
            sub: account.user_id.clone(),
            username: account.username.clone(),
            user_role: account.role.code(),
            exp,
            iat,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to encode JWT token")
    }

    /// Validate JWT token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims> {
        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .context("Failed to decode JWT token")?;

        Ok(token_data.claims)
    }
}

/// Generate a random JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}
