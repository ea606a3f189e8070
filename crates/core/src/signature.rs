//! Payment gateway signatures
//!
//! The gateway signs `"{order_id}|{payment_id}"` with HMAC-SHA256 under the merchant secret and
//! sends the lowercase hex digest with its success callback.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Errors raised while checking a payment signature.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    /// The secret could not key the MAC.
    #[error("invalid signing key")]
    InvalidKey,

    /// The signature was not hex.
    #[error("signature is not valid hex")]
    Malformed,

    /// The signature did not match.
    #[error("signature mismatch")]
    Mismatch,
}

fn mac(secret: &[u8], order_id: &str, payment_id: &str) -> Result<HmacSha256, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret).map_err(|_invalid_length| SignatureError::InvalidKey)?;

    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    Ok(mac)
}

/// Signature the gateway is expected to send for an order and payment.
///
/// # Errors
///
/// Returns [`SignatureError::InvalidKey`] if the secret cannot key the MAC.
pub fn sign(secret: &[u8], order_id: &str, payment_id: &str) -> Result<String, SignatureError> {
    Ok(hex::encode(
        mac(secret, order_id, payment_id)?.finalize().into_bytes(),
    ))
}

/// Check a gateway signature in constant time.
///
/// # Errors
///
/// - [`SignatureError::Malformed`]: `signature` is not hex.
/// - [`SignatureError::Mismatch`]: the signature does not match.
pub fn verify(
    secret: &[u8],
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<(), SignatureError> {
    let expected = hex::decode(signature.trim()).map_err(|_decode| SignatureError::Malformed)?;

    mac(secret, order_id, payment_id)?
        .verify_slice(&expected)
        .map_err(|_mismatch| SignatureError::Mismatch)
}
