mod dockerfile_inspector;
mod request_signer;

pub use dockerfile_inspector::DockerfileInspector;
pub use request_signer::{NonceSource, OsNonceSource, RequestSigner, SignerError, NONCE_LEN};
