//! Request signing for the v1 API.
//!
//! Every v1 request carries four injected parameters (`api_nonce`, `api_key`,
//! `api_format`, `api_timestamp`) and an `api_signature` computed over the
//! whole parameter set:
//!
//! 1. Keys are sorted in ascending byte order.
//! 2. For each key, every value is appended as `key=value`. Key groups are
//!    separated by `&`, but repeated values of the same key are concatenated
//!    with no separator (`tag=atag=b`). The deployed API verifies exactly this
//!    form.
//! 3. The raw API secret is appended.
//! 4. The signature is the lowercase hex SHA1 of the resulting string.
//!
//! This is a plain keyed digest, not an HMAC.

use crate::v1::params::Params;
use rand::Rng;
use sha1::{Digest, Sha1};
use std::fmt;

pub const NONCE_PARAM: &str = "api_nonce";
pub const KEY_PARAM: &str = "api_key";
pub const FORMAT_PARAM: &str = "api_format";
pub const TIMESTAMP_PARAM: &str = "api_timestamp";
pub const SIGNATURE_PARAM: &str = "api_signature";

/// The only response format the client asks for.
pub const FORMAT: &str = "json";

/// API key and shared secret for the v1 API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// Source of the per-request `api_nonce`.
pub trait NonceSource: fmt::Debug + Send + Sync {
    /// Returns an 8 digit, zero-padded decimal string.
    fn nonce(&self) -> String;
}

/// Draws nonces from the calling thread's RNG.
///
/// The thread-local generator is seeded once from the OS and never reseeded,
/// so concurrent requests share no mutable RNG state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNonce;

impl NonceSource for RandomNonce {
    fn nonce(&self) -> String {
        format!("{:08}", rand::thread_rng().gen_range(0..100_000_000u32))
    }
}

/// Source of the per-request `api_timestamp`.
pub trait Clock: fmt::Debug + Send + Sync {
    /// Current time in whole seconds since the Unix epoch.
    fn unix_seconds(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> i64 {
        jiff::Timestamp::now().as_second()
    }
}

/// Builds the string that gets hashed into `api_signature`.
pub fn base_string(params: &Params, secret: &str) -> String {
    let mut sbs = String::new();
    for (i, (key, values)) in params.iter().enumerate() {
        if i != 0 {
            sbs.push('&');
        }
        for value in values {
            sbs.push_str(key);
            sbs.push('=');
            sbs.push_str(value);
        }
    }
    sbs.push_str(secret);
    sbs
}

/// Lowercase hex SHA1 digest of `input`.
pub fn digest(input: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Injects the authentication parameters into `params` and signs the result.
///
/// Caller-supplied values for any of the injected names are overwritten. The
/// signature is the last parameter written.
pub fn sign(mut params: Params, credentials: &Credentials, nonce: &str, timestamp: i64) -> Params {
    params.set(NONCE_PARAM, nonce);
    params.set(KEY_PARAM, credentials.api_key.as_str());
    params.set(FORMAT_PARAM, FORMAT);
    params.set(TIMESTAMP_PARAM, timestamp.to_string());
    // a stale signature must not take part in its own computation
    params.remove(SIGNATURE_PARAM);

    let signature = digest(&base_string(&params, &credentials.api_secret));
    params.set(SIGNATURE_PARAM, signature);
    params
}
