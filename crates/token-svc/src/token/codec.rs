//! Signed-and-encrypted opaque token codec.
//!
//! This module is intentionally free of HTTP dependencies. It provides the
//! encode/decode operations behind `POST /token/encode` and `POST /token/decode`.
//!
//! # Token construction
//!
//! ```text
//! signed_block = base64(json(payload)) . base64(hmac-sha256(json(payload)))
//! token        = base64(aes-256-cbc-pkcs7(signed_block, key, iv))
//! context      = hex(iv)
//! ```
//!
//! The HMAC is computed over the *base64-decoded* bytes of the encoded
//! payload, i.e. the raw JSON bytes, not the base64 text. Tokens issued by
//! earlier deployments were signed this way, so this byte-level contract must
//! not change.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use serde::Serialize;
use sha2::Sha256;

use common::TokenError;

use super::keys::{EncryptionKey, SignatureKey};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Byte length of the CBC initialization vector (one AES block).
pub const IV_LEN: usize = 16;

/// Delimiter between the encoded payload and its signature inside a block.
const DELIMITER: u8 = b'.';

/// An encoded token together with the context required to decode it.
///
/// The pair is only meaningful as a unit: the context carries the IV used for
/// this specific encryption and cannot decrypt any other token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedToken {
    /// Base64 ciphertext.
    pub token: String,
    /// Hex-encoded IV.
    pub context: String,
}

/// Stateless codec over a process-wide pair of secret keys.
///
/// Both operations are pure CPU-bound transforms over independent buffers, so
/// a shared `TokenCodec` may be called concurrently without synchronisation.
#[derive(Debug)]
pub struct TokenCodec {
    signature_key: SignatureKey,
    encryption_key: EncryptionKey,
}

impl TokenCodec {
    /// Create a codec from validated key material.
    pub fn new(signature_key: SignatureKey, encryption_key: EncryptionKey) -> Self {
        Self {
            signature_key,
            encryption_key,
        }
    }

    /// Encode a payload into an opaque token and its decode context.
    ///
    /// Every call draws a fresh random IV, so encoding the same payload twice
    /// yields two distinct, independently valid tokens.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::SerializationError`] if the payload cannot be
    /// serialised to JSON. There are no other failure modes.
    pub fn encode<T: Serialize>(&self, payload: &T) -> Result<SealedToken, TokenError> {
        let json_bytes =
            serde_json::to_vec(payload).map_err(|_| TokenError::SerializationError)?;

        // Sign the raw JSON bytes (the base64-decoded form of `encoded`).
        let encoded = STANDARD.encode(&json_bytes);
        let signature = STANDARD.encode(self.sign(&json_bytes));
        let signed_block = format!("{encoded}.{signature}");

        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new(self.encryption_key.as_bytes().into(), (&iv).into())
            .encrypt_padded_vec_mut::<Pkcs7>(signed_block.as_bytes());

        Ok(SealedToken {
            token: STANDARD.encode(ciphertext),
            context: hex::encode(iv),
        })
    }

    /// Decode and verify a token/context pair back into its payload.
    ///
    /// # Errors
    ///
    /// - [`TokenError::MissingParams`] — either input is empty; checked before
    ///   any cryptographic work.
    /// - [`TokenError::InvalidParams`] — any structural failure: bad base64 or
    ///   hex, wrong IV length, corrupt ciphertext or padding, or a payload
    ///   that does not parse as JSON. The causes are deliberately not
    ///   distinguished.
    /// - [`TokenError::Unauthorized`] — the block decrypted and split cleanly
    ///   but its signature does not verify.
    pub fn decode(&self, token: &str, context: &str) -> Result<serde_json::Value, TokenError> {
        if token.is_empty() || context.is_empty() {
            return Err(TokenError::MissingParams);
        }

        let ciphertext = STANDARD
            .decode(token)
            .map_err(|_| TokenError::InvalidParams)?;
        let iv_bytes = hex::decode(context).map_err(|_| TokenError::InvalidParams)?;
        let iv: [u8; IV_LEN] = iv_bytes
            .try_into()
            .map_err(|_| TokenError::InvalidParams)?;

        let plaintext = Aes256CbcDec::new(self.encryption_key.as_bytes().into(), (&iv).into())
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| TokenError::InvalidParams)?;

        // Split on the first delimiter. A block with no delimiter carries an
        // empty signature part and fails verification below.
        let (encoded, signature) = match plaintext.iter().position(|&b| b == DELIMITER) {
            Some(i) => (&plaintext[..i], &plaintext[i + 1..]),
            None => (&plaintext[..], &[][..]),
        };
        if encoded.is_empty() {
            return Err(TokenError::InvalidParams);
        }

        // Recompute the HMAC over the decoded bytes, exactly as encode signed.
        let json_bytes = STANDARD
            .decode(encoded)
            .map_err(|_| TokenError::InvalidParams)?;

        // A signature slot holding non-base64 bytes is a forged signature,
        // not a structural error: the block itself was well formed.
        let claimed = STANDARD
            .decode(signature)
            .map_err(|_| TokenError::Unauthorized)?;
        let mut mac = self.mac();
        mac.update(&json_bytes);
        mac.verify_slice(&claimed)
            .map_err(|_| TokenError::Unauthorized)?;

        serde_json::from_slice(&json_bytes).map_err(|_| TokenError::InvalidParams)
    }

    /// HMAC-SHA-256 over `data` under the signature key.
    fn sign(&self, data: &[u8]) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(data);
        mac.finalize().into_bytes().to_vec()
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC-SHA-256 accepts keys of any length; SignatureKey is non-empty.
        HmacSha256::new_from_slice(self.signature_key.as_bytes())
            .expect("HMAC accepts any key length")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_codec() -> TokenCodec {
        TokenCodec::new(
            SignatureKey::new("test-signature-key").unwrap(),
            EncryptionKey::from_hex(&"42".repeat(32)).unwrap(),
        )
    }

    /// Encrypt an arbitrary signed block under the codec's test key, for
    /// forged-token vectors.
    fn encrypt_block(block: &[u8], iv: &[u8; IV_LEN]) -> String {
        let key = EncryptionKey::from_hex(&"42".repeat(32)).unwrap();
        let ct = Aes256CbcEnc::new(key.as_bytes().into(), iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(block);
        STANDARD.encode(ct)
    }

    #[test]
    fn round_trip_returns_original_payload() {
        let codec = test_codec();
        let payload = json!({
            "user": "alice",
            "roles": ["staff", "speaker"],
            "badge": 1042,
            "nested": {"checked_in": true, "note": null}
        });
        let sealed = codec.encode(&payload).unwrap();
        let recovered = codec.decode(&sealed.token, &sealed.context).unwrap();
        assert_eq!(recovered, payload);
    }

    #[test]
    fn round_trip_non_object_payloads() {
        let codec = test_codec();
        for payload in [json!([1, 2, 3]), json!("just a string"), json!(42), json!(null)] {
            let sealed = codec.encode(&payload).unwrap();
            assert_eq!(codec.decode(&sealed.token, &sealed.context).unwrap(), payload);
        }
    }

    #[test]
    fn same_payload_yields_distinct_tokens() {
        let codec = test_codec();
        let payload = json!({"event": "closing-ceremony"});
        let a = codec.encode(&payload).unwrap();
        let b = codec.encode(&payload).unwrap();
        assert_ne!(a.token, b.token);
        assert_ne!(a.context, b.context);
        assert_eq!(codec.decode(&a.token, &a.context).unwrap(), payload);
        assert_eq!(codec.decode(&b.token, &b.context).unwrap(), payload);
    }

    #[test]
    fn empty_inputs_are_missing_params() {
        let codec = test_codec();
        let sealed = codec.encode(&json!({"a": 1})).unwrap();
        assert_eq!(codec.decode("", &sealed.context), Err(TokenError::MissingParams));
        assert_eq!(codec.decode(&sealed.token, ""), Err(TokenError::MissingParams));
        assert_eq!(codec.decode("", ""), Err(TokenError::MissingParams));
    }

    #[test]
    fn malformed_inputs_are_invalid_params() {
        let codec = test_codec();
        let sealed = codec.encode(&json!({"a": 1})).unwrap();

        // Non-base64 token, non-hex context.
        assert_eq!(codec.decode("asdf!", &sealed.context), Err(TokenError::InvalidParams));
        assert_eq!(codec.decode(&sealed.token, "potato"), Err(TokenError::InvalidParams));
        // Valid hex but not a 16-byte IV.
        assert_eq!(codec.decode(&sealed.token, "abcd"), Err(TokenError::InvalidParams));
        // Valid base64 that is not a whole number of cipher blocks.
        assert_eq!(codec.decode("YWJjZA==", &sealed.context), Err(TokenError::InvalidParams));
    }

    #[test]
    fn tampered_ciphertext_never_decodes() {
        let codec = test_codec();
        let payload = json!({"user": "bob", "paid": true});
        let sealed = codec.encode(&payload).unwrap();
        let mut ciphertext = STANDARD.decode(&sealed.token).unwrap();

        for i in 0..ciphertext.len() {
            ciphertext[i] ^= 0x01;
            let tampered = STANDARD.encode(&ciphertext);
            match codec.decode(&tampered, &sealed.context) {
                Err(TokenError::InvalidParams) | Err(TokenError::Unauthorized) => {}
                other => panic!("tampered byte {i} produced {other:?}"),
            }
            ciphertext[i] ^= 0x01;
        }
    }

    #[test]
    fn context_from_another_token_is_rejected() {
        let codec = test_codec();
        let a = codec.encode(&json!({"seat": "A1"})).unwrap();
        let b = codec.encode(&json!({"seat": "B2"})).unwrap();
        match codec.decode(&a.token, &b.context) {
            Err(TokenError::InvalidParams) | Err(TokenError::Unauthorized) => {}
            other => panic!("cross-paired context produced {other:?}"),
        }
    }

    #[test]
    fn foreign_signature_key_is_unauthorized() {
        let codec = test_codec();
        let foreign = TokenCodec::new(
            SignatureKey::new("some-other-signature-key").unwrap(),
            EncryptionKey::from_hex(&"42".repeat(32)).unwrap(),
        );
        // Same encryption key, different signature key: decrypt and split
        // succeed, signature verification must not.
        let sealed = foreign.encode(&json!({"user": "mallory"})).unwrap();
        assert_eq!(
            codec.decode(&sealed.token, &sealed.context),
            Err(TokenError::Unauthorized)
        );
    }

    #[test]
    fn well_formed_block_with_bad_signature_is_exactly_unauthorized() {
        let codec = test_codec();
        let encoded = STANDARD.encode(br#"{"user":"mallory"}"#);
        let bad_sig = STANDARD.encode([0u8; 32]);
        let block = format!("{encoded}.{bad_sig}");
        let iv = [7u8; IV_LEN];

        let token = encrypt_block(block.as_bytes(), &iv);
        assert_eq!(
            codec.decode(&token, &hex::encode(iv)),
            Err(TokenError::Unauthorized)
        );
    }

    #[test]
    fn block_without_delimiter_is_unauthorized() {
        let codec = test_codec();
        let encoded = STANDARD.encode(br#"{"user":"mallory"}"#);
        let iv = [9u8; IV_LEN];
        let token = encrypt_block(encoded.as_bytes(), &iv);
        assert_eq!(
            codec.decode(&token, &hex::encode(iv)),
            Err(TokenError::Unauthorized)
        );
    }

    #[test]
    fn signature_covers_decoded_bytes_not_base64_text() {
        // Hand-built vector: signing the raw JSON bytes must verify, which
        // pins the decoded-bytes signing contract.
        let codec = test_codec();
        let json_bytes = br#"{"badge":7}"#;
        let encoded = STANDARD.encode(json_bytes);

        let mut mac = HmacSha256::new_from_slice(b"test-signature-key").unwrap();
        mac.update(json_bytes);
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        let iv = [3u8; IV_LEN];
        let token = encrypt_block(format!("{encoded}.{signature}").as_bytes(), &iv);
        let recovered = codec.decode(&token, &hex::encode(iv)).unwrap();
        assert_eq!(recovered, json!({"badge": 7}));
    }

    #[test]
    fn signature_over_base64_text_does_not_verify() {
        let codec = test_codec();
        let json_bytes = br#"{"badge":7}"#;
        let encoded = STANDARD.encode(json_bytes);

        // Sign the base64 text instead of the decoded bytes.
        let mut mac = HmacSha256::new_from_slice(b"test-signature-key").unwrap();
        mac.update(encoded.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        let iv = [4u8; IV_LEN];
        let token = encrypt_block(format!("{encoded}.{signature}").as_bytes(), &iv);
        assert_eq!(
            codec.decode(&token, &hex::encode(iv)),
            Err(TokenError::Unauthorized)
        );
    }

    #[test]
    fn unserializable_payload_is_serialization_error() {
        use std::collections::HashMap;
        let codec = test_codec();
        // JSON object keys must be strings; byte-vector keys cannot serialise.
        let mut bad: HashMap<Vec<u8>, u32> = HashMap::new();
        bad.insert(vec![1, 2, 3], 9);
        assert_eq!(codec.encode(&bad), Err(TokenError::SerializationError));
    }

    #[test]
    fn concurrent_calls_match_single_threaded_semantics() {
        use std::sync::Arc;
        let codec = Arc::new(test_codec());
        let mut handles = Vec::new();
        for t in 0..8 {
            let codec = Arc::clone(&codec);
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    let payload = json!({"thread": t, "iter": i});
                    let sealed = codec.encode(&payload).unwrap();
                    let recovered = codec.decode(&sealed.token, &sealed.context).unwrap();
                    assert_eq!(recovered, payload);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
    }
}
