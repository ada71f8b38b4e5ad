//! Per-party asymmetric key material.
//!
//! A [`KeyPrincipal`] owns one RSA key pair. The private half has no accessor:
//! the only way to use it is through [`KeyPrincipal::sign`] and
//! [`KeyPrincipal::decrypt`]. Public-key operations are free functions over
//! [`RsaPublicKey`] because any party can perform them.

use std::fmt;

use rand_core::OsRng;
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::{Oaep, Pss, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::errors::ProtocolError;

pub use rsa::RsaPublicKey as PublicKey;

pub const DEFAULT_KEY_BITS: usize = 2048;
/// OAEP-SHA256 on smaller moduli cannot carry an envelope payload.
pub const MIN_KEY_BITS: usize = 1024;

#[derive(Clone)]
pub struct KeyPrincipal {
    private: RsaPrivateKey,
    public: RsaPublicKey,
}

impl KeyPrincipal {
    pub fn generate() -> Result<Self, ProtocolError> {
        Self::generate_with_bits(DEFAULT_KEY_BITS)
    }

    pub fn generate_with_bits(bits: usize) -> Result<Self, ProtocolError> {
        if bits < MIN_KEY_BITS {
            return Err(ProtocolError::WrongKeySize {
                bits,
                minimum: MIN_KEY_BITS,
            });
        }
        let private = RsaPrivateKey::new(&mut OsRng, bits)
            .map_err(|e| ProtocolError::KeyGeneration(e.to_string()))?;
        let public = RsaPublicKey::from(&private);
        Ok(Self { private, public })
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// SubjectPublicKeyInfo PEM, the form in which public keys are exchanged.
    pub fn public_key_pem(&self) -> Result<String, ProtocolError> {
        self.public
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| ProtocolError::KeyGeneration(e.to_string()))
    }

    /// RSASSA-PSS over SHA-256 with a random salt.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        let digest = Sha256::digest(message);
        self.private
            .sign_with_rng(&mut OsRng, Pss::new::<Sha256>(), &digest)
            .map_err(|e| ProtocolError::Signing(e.to_string()))
    }

    /// RSAES-OAEP (SHA-256) decryption. Any failure is reported uniformly.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, ProtocolError> {
        self.private
            .decrypt(Oaep::new::<Sha256>(), ciphertext)
            .map_err(|_| ProtocolError::Decryption)
    }
}

impl fmt::Debug for KeyPrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPrincipal")
            .field("public", &self.public)
            .field("private", &"<redacted>")
            .finish()
    }
}

pub fn encrypt_for(recipient: &RsaPublicKey, message: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    recipient
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), message)
        .map_err(|e| ProtocolError::Encryption(e.to_string()))
}

pub fn verify_signature(
    signer: &RsaPublicKey,
    message: &[u8],
    signature: &[u8],
) -> Result<(), ProtocolError> {
    let digest = Sha256::digest(message);
    signer
        .verify(Pss::new::<Sha256>(), &digest, signature)
        .map_err(|_| ProtocolError::SignatureMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_undersized_keys() {
        assert_eq!(
            KeyPrincipal::generate_with_bits(512).unwrap_err(),
            ProtocolError::WrongKeySize {
                bits: 512,
                minimum: MIN_KEY_BITS
            }
        );
    }

    #[test]
    fn sign_verify_and_encrypt_decrypt() {
        let keys = KeyPrincipal::generate_with_bits(MIN_KEY_BITS).unwrap();
        let sig = keys.sign(b"payload").unwrap();
        assert!(verify_signature(keys.public_key(), b"payload", &sig).is_ok());
        assert_eq!(
            verify_signature(keys.public_key(), b"other", &sig),
            Err(ProtocolError::SignatureMismatch)
        );

        let ct = encrypt_for(keys.public_key(), b"secret").unwrap();
        assert_eq!(keys.decrypt(&ct).unwrap(), b"secret");

        let pem = keys.public_key_pem().unwrap();
        assert!(pem.starts_with("-----BEGIN PUBLIC KEY-----"));
        assert!(!format!("{:?}", keys).contains("primes"));
    }
}
