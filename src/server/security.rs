//! Credential hashing. Passwords and student IC numbers are stored as Argon2 PHC strings.

use anyhow::{anyhow, Result};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};

pub fn hash_secret(secret: &str) -> Result<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!(e.to_string()))?;
    let phc = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| anyhow!(e.to_string()))?
        .to_string();
    Ok(phc)
}

pub fn verify_secret(hash: &str, secret: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(secret.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

/// [`hash_secret`] on the blocking pool, for use inside request handlers.
pub async fn hash_secret_blocking(secret: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_secret(&secret))
        .await
        .map_err(|e| anyhow!(e.to_string()))?
}

/// [`verify_secret`] on the blocking pool. A failed task counts as a mismatch.
pub async fn verify_secret_blocking(hash: String, secret: String) -> bool {
    tokio::task::spawn_blocking(move || verify_secret(&hash, &secret)).await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_roundtrip() {
        let h = hash_secret("010101-01-0101").unwrap();
        assert!(h.starts_with("$argon2"));
        assert!(verify_secret(&h, "010101-01-0101"));
        assert!(!verify_secret(&h, "010101-01-0102"));
        assert!(!verify_secret("not a phc string", "x"));
    }

    #[tokio::test]
    async fn blocking_pool_variants_agree() {
        let h = hash_secret_blocking("s3cret".to_string()).await.unwrap();
        assert!(verify_secret(&h, "s3cret"));
        assert!(verify_secret_blocking(h.clone(), "s3cret".to_string()).await);
        assert!(!verify_secret_blocking(h, "wrong".to_string()).await);
    }
}
