//! Snapshot encryption
//!
//! ChaCha20-Poly1305 AEAD over the serialized snapshot. The key is not
//! embedded in the binary: it lives in a key file next to the store,
//! generated on first run with 0600 permissions.

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chacha20poly1305::aead::{Aead, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Nonce};
use tracing::info;

use crate::error::StoreError;

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Encrypt plaintext, returning base64-encoded nonce + ciphertext
pub fn seal(plaintext: &str, key: &[u8; KEY_LEN]) -> Result<String, StoreError> {
    let cipher = ChaCha20Poly1305::new(key.into());

    let mut nonce_bytes = [0u8; NONCE_LEN];
    chacha20poly1305::aead::rand_core::RngCore::fill_bytes(&mut OsRng, &mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| StoreError::Cipher("encryption failed".to_string()))?;

    let mut combined = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    combined.extend_from_slice(&nonce_bytes);
    combined.extend_from_slice(&ciphertext);

    Ok(BASE64.encode(combined))
}

/// Decrypt a base64-encoded nonce + ciphertext blob
pub fn open(encoded: &str, key: &[u8; KEY_LEN]) -> Result<String, StoreError> {
    let combined = BASE64
        .decode(encoded.trim())
        .map_err(|_| StoreError::Cipher("invalid encoding".to_string()))?;

    if combined.len() < NONCE_LEN {
        return Err(StoreError::Cipher("blob too short".to_string()));
    }

    let (nonce_bytes, ciphertext) = combined.split_at(NONCE_LEN);
    let cipher = ChaCha20Poly1305::new(key.into());

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| StoreError::Cipher("decryption failed".to_string()))?;

    String::from_utf8(plaintext).map_err(|_| StoreError::Cipher("invalid utf-8".to_string()))
}

/// Generate a random 256-bit key
pub fn generate_key() -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    chacha20poly1305::aead::rand_core::RngCore::fill_bytes(&mut OsRng, &mut key);
    key
}

/// Load the key file, creating it on first run
pub fn load_or_create_key(path: &Path) -> Result<[u8; KEY_LEN], StoreError> {
    if path.exists() {
        let encoded = fs::read_to_string(path)?;
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|_| StoreError::Cipher("invalid key encoding".to_string()))?;
        if bytes.len() != KEY_LEN {
            return Err(StoreError::Cipher("invalid key length".to_string()));
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&bytes);
        return Ok(key);
    }

    let key = generate_key();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, BASE64.encode(key))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    info!(path = %path.display(), "Generated new store key");
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_seal_open_roundtrip() {
        let key = generate_key();
        let plaintext = r#"{"projects":[],"documents":[]}"#;
        let sealed = seal(plaintext, &key).unwrap();
        assert_ne!(sealed, plaintext);
        assert_eq!(open(&sealed, &key).unwrap(), plaintext);
    }

    #[test]
    fn test_random_nonce_varies_ciphertext() {
        let key = generate_key();
        let a = seal("same input", &key).unwrap();
        let b = seal("same input", &key).unwrap();
        assert_ne!(a, b);
        assert_eq!(open(&a, &key).unwrap(), open(&b, &key).unwrap());
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = seal("secret", &generate_key()).unwrap();
        assert!(matches!(open(&sealed, &generate_key()), Err(StoreError::Cipher(_))));
    }

    #[test]
    fn test_tampered_blob_fails() {
        let key = generate_key();
        let sealed = seal("secret", &key).unwrap();
        let mut bytes = BASE64.decode(sealed).unwrap();
        if let Some(last) = bytes.last_mut() {
            *last ^= 0x01;
        }
        let tampered = BASE64.encode(bytes);
        assert!(open(&tampered, &key).is_err());
    }

    #[test]
    fn test_garbage_input_fails_closed() {
        let key = generate_key();
        assert!(open("not base64 at all!", &key).is_err());
        assert!(open("", &key).is_err());
    }

    #[test]
    fn test_load_or_create_key_is_stable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("keys").join("store.key");

        let first = load_or_create_key(&path).unwrap();
        assert!(path.exists());
        let second = load_or_create_key(&path).unwrap();
        assert_eq!(first, second);
    }
}
