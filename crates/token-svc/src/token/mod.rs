//! Opaque token primitives: key material and the encode/decode codec.
//!
//! # Token format
//!
//! ```text
//! token   = base64(aes-256-cbc(base64(payload) . base64(hmac), key, iv))
//! context = hex(iv)
//! ```
//!
//! A token is only decodable together with the context minted in the same
//! encode call. Neither value is stored server-side; expiry and reuse policy
//! belong to the caller.

pub mod codec;
pub mod keys;

pub use codec::{SealedToken, TokenCodec};
pub use keys::{EncryptionKey, SignatureKey};
