//! CoinPayments request signing.
//!
//! Every API call carries an `HMAC` header holding the hex-encoded
//! `HMAC-SHA512(form_body, private_key)`, where `form_body` is the exact
//! url-encoded body sent on the wire.

/// Header name carrying the request signature.
pub const HMAC_HEADER: &str = "HMAC";

/// Sign a raw form body with the merchant's private API key.
pub fn sign_form_body(body: &str, private_key: &[u8]) -> String {
    let tag = ring::hmac::sign(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA512, private_key),
        body.as_bytes(),
    );
    hex::encode(tag.as_ref())
}
