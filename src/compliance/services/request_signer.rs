use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

const AUTH_SCHEME: &str = "VERACODE-HMAC-SHA-256";
const REQUEST_VERSION: &str = "vcode_request_version_1";
pub const NONCE_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("API key is not valid hex: {0}")]
    InvalidKey(#[from] hex::FromHexError),

    #[error("API key is empty")]
    EmptyKey,

    #[error("HMAC rejected the derived key: {0}")]
    Mac(#[from] hmac::digest::InvalidLength),
}

/// Supplies the per-request random bytes.
pub trait NonceSource: Send + Sync {
    fn nonce(&self) -> [u8; NONCE_LEN];
}

/// Nonces drawn from the operating system's CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn nonce(&self) -> [u8; NONCE_LEN] {
        let mut bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut bytes);
        bytes
    }
}

/// RequestSigner builds authentication headers for the security platform API
///
/// The signature is a chain of four HMAC-SHA-256 steps: the key signs the nonce,
/// that result signs the timestamp, that signs a fixed version literal, and the
/// final key signs the canonical request string.
pub struct RequestSigner {
    api_id: String,
    key: Vec<u8>,
    nonces: Box<dyn NonceSource>,
}

impl RequestSigner {
    /// Creates a signer from an API id and a hex-encoded API key
    ///
    /// # Arguments
    /// * `api_id` - Public API identifier, sent in clear in the header
    /// * `api_key_hex` - Shared secret as issued by the platform, hex-encoded
    ///
    /// # Errors
    /// Returns an error if the key is empty or not valid hex
    pub fn new(api_id: impl Into<String>, api_key_hex: &str) -> Result<Self, SignerError> {
        let trimmed = api_key_hex.trim();
        if trimmed.is_empty() {
            return Err(SignerError::EmptyKey);
        }
        Ok(Self {
            api_id: api_id.into(),
            key: hex::decode(trimmed)?,
            nonces: Box::new(OsNonceSource),
        })
    }

    pub fn with_nonce_source(mut self, nonces: Box<dyn NonceSource>) -> Self {
        self.nonces = nonces;
        self
    }

    /// Header value for one request, using the current time and a fresh nonce
    ///
    /// # Arguments
    /// * `host` - API host name, without scheme
    /// * `url` - Path and query string exactly as sent
    /// * `method` - HTTP method in upper case
    pub fn authorization_header(
        &self,
        host: &str,
        url: &str,
        method: &str,
    ) -> Result<String, SignerError> {
        let timestamp_ms = Utc::now().timestamp_millis();
        let nonce = self.nonces.nonce();
        self.sign_at(host, url, method, timestamp_ms, &nonce)
    }

    /// Deterministic form of [`authorization_header`](Self::authorization_header).
    pub fn sign_at(
        &self,
        host: &str,
        url: &str,
        method: &str,
        timestamp_ms: i64,
        nonce: &[u8],
    ) -> Result<String, SignerError> {
        let timestamp = timestamp_ms.to_string();
        let canonical = format!(
            "id={}&host={}&url={}&method={}",
            self.api_id, host, url, method
        );

        let hashed_nonce = hmac_sha256(&self.key, nonce)?;
        let hashed_timestamp = hmac_sha256(&hashed_nonce, timestamp.as_bytes())?;
        let hashed_version = hmac_sha256(&hashed_timestamp, REQUEST_VERSION.as_bytes())?;
        let signature = hmac_sha256(&hashed_version, canonical.as_bytes())?;

        Ok(format!(
            "{} id={},ts={},nonce={},sig={}",
            AUTH_SCHEME,
            self.api_id,
            timestamp,
            hex::encode(nonce),
            hex::encode(signature)
        ))
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>, SignerError> {
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}
