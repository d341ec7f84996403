use hmac::{Hmac, Mac};
use sha2::Sha512;
use url::form_urlencoded;

use crate::params::Params;

type HmacSha512 = Hmac<Sha512>;

/// Form-encoded body paired with the HMAC computed over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub body: String,
    pub signature: String,
}

/// Encode params as `application/x-www-form-urlencoded`, in insertion order.
pub fn encode_params(params: &Params) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.iter() {
        serializer.append_pair(key, &value.to_string());
    }
    serializer.finish()
}

/// Compute HMAC-SHA512 over the given body bytes using the private key.
/// Returns the lowercase hex-encoded MAC.
pub fn compute_hmac(secret: &[u8], body: &[u8]) -> String {
    let mut mac = HmacSha512::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Encode the params and sign the encoded bytes.
pub fn sign(params: &Params, private_key: &str) -> SignedRequest {
    let body = encode_params(params);
    let signature = compute_hmac(private_key.as_bytes(), body.as_bytes());
    SignedRequest { body, signature }
}

/// Verify an HMAC-SHA512 signature against the expected body, e.g. an IPN
/// callback signed with the merchant's IPN secret.
///
/// Uses constant-time comparison. Invalid hex is compared against zeros so
/// it takes the same path as a wrong signature.
pub fn verify_hmac(secret: &[u8], body: &[u8], signature: &str) -> bool {
    let mut mac = HmacSha512::new_from_slice(secret).expect("HMAC accepts any key length");
    mac.update(body);

    let expected = hex::decode(signature).unwrap_or_else(|_| vec![0u8; 64]);
    mac.verify_slice(&expected).is_ok()
}
