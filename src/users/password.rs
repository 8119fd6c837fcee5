use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use tokio::task;
use tracing::error;

use crate::config::HashParams;
use crate::error::{StoreError, StoreResult};

fn hasher(params: HashParams) -> StoreResult<Argon2<'static>> {
    let params = Params::new(params.memory_kib, params.iterations, params.parallelism, None)
        .map_err(|e| StoreError::Hash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a plaintext password with a per-call random salt. CPU-bound, so
/// it runs on the blocking pool rather than the async executor.
pub async fn hash_password(plain: &str, params: HashParams) -> StoreResult<String> {
    let plain = plain.to_owned();
    task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        let hash = hasher(params)?
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                StoreError::Hash(e.to_string())
            })?
            .to_string();
        Ok(hash)
    })
    .await
    .map_err(|e| StoreError::Hash(format!("hashing task failed: {e}")))?
}

/// Check a plaintext candidate against a stored digest. Not used by the
/// repository itself; exported for authentication flows.
pub async fn verify_password(plain: &str, hash: &str) -> StoreResult<bool> {
    let plain = plain.to_owned();
    let hash = hash.to_owned();
    task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash).map_err(|e| {
            error!(error = %e, "argon2 parse hash error");
            StoreError::Hash(e.to_string())
        })?;
        // Cost parameters come from the digest itself.
        Ok(Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| StoreError::Hash(format!("verify task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_params() -> HashParams {
        HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[tokio::test]
    async fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password, cheap_params())
            .await
            .expect("hashing should succeed");
        assert!(verify_password(password, &hash)
            .await
            .expect("verify should succeed"));
    }

    #[tokio::test]
    async fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password, cheap_params())
            .await
            .expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash)
            .await
            .expect("verify should not error"));
    }

    #[tokio::test]
    async fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Hash(_)));
    }

    #[tokio::test]
    async fn invalid_cost_surfaces_as_hash_error() {
        // Memory below argon2's minimum for the given parallelism.
        let params = HashParams {
            memory_kib: 1,
            iterations: 1,
            parallelism: 1,
        };
        let err = hash_password("whatever", params).await.unwrap_err();
        assert!(matches!(err, StoreError::Hash(_)));
    }
}
