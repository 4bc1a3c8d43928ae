use anyhow::Result;
use ed25519_dalek::{Signature, VerifyingKey};
use sha2::{Digest as _, Sha512};

use crate::error::TrustError;

/// Parse the pinned hex-encoded Ed25519 public key.
pub fn parse_verifying_key(hex_key: &str) -> Result<VerifyingKey> {
    let bytes =
        hex::decode(hex_key.trim()).map_err(|_| TrustError("signing key is not valid hex".into()))?;
    let key_bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| TrustError("signing key must decode to 32 bytes".into()))?;
    let key = VerifyingKey::from_bytes(&key_bytes)
        .map_err(|_| TrustError("signing key is not a valid Ed25519 key".into()))?;
    Ok(key)
}

/// Accepts the 64 raw signature bytes, or those bytes hex encoded as text.
pub fn parse_signature(raw: &[u8]) -> Result<Signature> {
    if let Ok(bytes) = <[u8; 64]>::try_from(raw) {
        return Ok(Signature::from_bytes(&bytes));
    }

    let text = std::str::from_utf8(raw)
        .ok()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| TrustError("detached signature is neither 64 raw bytes nor text".into()))?;
    let decoded =
        hex::decode(text).map_err(|_| TrustError("detached signature is not valid hex".into()))?;
    let bytes: [u8; 64] = decoded
        .try_into()
        .map_err(|_| TrustError("detached signature must decode to 64 bytes".into()))?;
    Ok(Signature::from_bytes(&bytes))
}

/// Accumulates the streamed archive into an Ed25519ph verification.
///
/// Fed chunk-by-chunk as the download advances; [`StreamVerifier::finish`]
/// gives a verdict only once the entire stream has passed through, so nothing
/// needs to be buffered.
pub struct StreamVerifier {
    prehash: Sha512,
    key: VerifyingKey,
    signature: Signature,
}

impl StreamVerifier {
    pub fn new(key: VerifyingKey, signature: Signature) -> Self {
        Self {
            prehash: Sha512::new(),
            key,
            signature,
        }
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.prehash.update(chunk);
    }

    pub fn finish(self) -> Result<()> {
        self.key
            .verify_prehashed(self.prehash, None, &self.signature)
            .map_err(|_| TrustError("archive signature verification failed".into()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::SigningKey;
    use rand::rngs::OsRng;

    use super::*;

    fn sign(key: &SigningKey, message: &[u8]) -> Signature {
        let mut prehash = Sha512::new();
        prehash.update(message);
        key.sign_prehashed(prehash, None).unwrap()
    }

    #[test]
    fn accepts_a_valid_stream() {
        let key = SigningKey::generate(&mut OsRng);
        let signature = sign(&key, b"hello kernel");

        let mut verifier = StreamVerifier::new(key.verifying_key(), signature);
        verifier.update(b"hello ");
        verifier.update(b"kernel");
        verifier.finish().unwrap();
    }

    #[test]
    fn rejects_a_corrupted_stream() {
        let key = SigningKey::generate(&mut OsRng);
        let signature = sign(&key, b"hello kernel");

        let mut verifier = StreamVerifier::new(key.verifying_key(), signature);
        verifier.update(b"hello kern__");
        let error = verifier.finish().unwrap_err();
        assert!(error.downcast_ref::<TrustError>().is_some());
    }

    #[test]
    fn rejects_a_foreign_signature() {
        let key = SigningKey::generate(&mut OsRng);
        let other = SigningKey::generate(&mut OsRng);
        let signature = sign(&other, b"hello kernel");

        let mut verifier = StreamVerifier::new(key.verifying_key(), signature);
        verifier.update(b"hello kernel");
        assert!(verifier.finish().is_err());
    }

    #[test]
    fn signature_parsing_accepts_raw_and_hex() {
        let key = SigningKey::generate(&mut OsRng);
        let signature = sign(&key, b"x");
        let raw = signature.to_bytes();

        assert_eq!(parse_signature(&raw).unwrap(), signature);
        assert_eq!(
            parse_signature(hex::encode(raw).as_bytes()).unwrap(),
            signature
        );
        assert!(parse_signature(b"not a signature").is_err());
    }

    #[test]
    fn key_parsing_rejects_bad_material() {
        assert!(parse_verifying_key("zz").is_err());
        assert!(parse_verifying_key("abcd").is_err());
    }
}
