pub mod credentials;
pub mod signature;

pub use credentials::PushCredentials;
pub use signature::{sign, sign_manifest, smime_to_der, verify_detached};
