//! Ed25519 keypairs for onion services

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

use crate::tor::{self, PUBLIC_KEY_FILE_LEN, SECRET_KEY_FILE_LEN};

/// An Ed25519 keypair
#[derive(Clone)]
pub struct Ed25519Keypair {
    signing_key: SigningKey,
}

impl Ed25519Keypair {
    /// Generate a new random keypair
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Create from a raw 32-byte seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Get the secret seed as bytes (32 bytes)
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// Get the public key as bytes (32 bytes)
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Contents of Tor's `hs_ed25519_secret_key` for this keypair
    pub fn tor_secret_key_file(&self) -> [u8; SECRET_KEY_FILE_LEN] {
        tor::secret_key_file(&tor::expand_secret_key(&self.secret_key_bytes()))
    }

    /// Contents of Tor's `hs_ed25519_public_key` for this keypair
    pub fn tor_public_key_file(&self) -> [u8; PUBLIC_KEY_FILE_LEN] {
        tor::public_key_file(&self.public_key_bytes())
    }

    /// Onion hostname of this keypair
    pub fn onion_hostname(&self) -> String {
        crate::onion::onion_hostname(&self.public_key_bytes())
    }
}

impl std::fmt::Debug for Ed25519Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Keypair")
            .field("public_key", &hex::encode(self.public_key_bytes()))
            .finish_non_exhaustive()
    }
}
