//! Error types for push package operations.
//!
//! This module defines the [`enum@Error`] enum covering every failure of the
//! packaging pipeline: configuration validation, filesystem staging, manifest
//! hashing, credential loading, signing, signature conversion and archiving.
//! Each kind is a distinct variant so callers can map them to specific
//! responses instead of string-matching messages.
//!
//! # See Also
//!
//! - [`crate::Result`] - Convenience type alias using this error

use std::path::PathBuf;
use thiserror::Error;

/// Error type for push package operations.
///
/// All public functions in this crate return [`crate::Result<T>`], which uses this error type.
/// Variants that involve a file carry the offending path.
///
/// # Examples
///
/// ```no_run
/// use pushpkg::{Error, PushPackage, PushPackageConfig};
///
/// # fn run(config: PushPackageConfig) {
/// let package = PushPackage::new(config);
/// match package.create_push_package("abcd") {
///     Ok(path) => println!("Built {}", path.display()),
///     Err(Error::Pkcs12Decrypt(msg)) => eprintln!("Wrong certificate passphrase? {msg}"),
///     Err(Error::IconCopy { path, .. }) => eprintln!("Icon missing: {}", path.display()),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # }
/// ```
#[derive(Debug, Error)]
pub enum Error {
    /// The website push identifier is not of the form `web.<label>(.<label>)*`.
    #[error("Invalid website push ID {0:?}: expected web.<reverse-domain>")]
    InvalidWebsitePushId(String),

    /// The allowed-domains list is empty.
    #[error("At least one allowed domain is required")]
    NoAllowedDomains,

    /// An allowed domain is not an absolute URL with a host.
    #[error("Invalid allowed domain {0:?}")]
    InvalidAllowedDomain(String),

    /// The landing URL template does not start with `http://` or `https://`.
    #[error("Invalid URL format string {0:?}: must start with http:// or https://")]
    InvalidUrlFormatString(String),

    /// The web-service URL is not an absolute http(s) URL.
    #[error("Invalid web service URL {0:?}")]
    InvalidWebServiceUrl(String),

    /// Any other configuration value is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// `create_push_package` was called with an empty token.
    #[error("Authentication token must not be empty")]
    EmptyAuthenticationToken,

    /// The per-invocation staging directory could not be created.
    #[error("Failed to create staging directory {}: {source}", path.display())]
    StagingDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured icon could not be copied into the staging directory.
    #[error("Failed to copy icon {}: {source}", path.display())]
    IconCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A generated file (`website.json`, `manifest.json`, `signature`) could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file (configuration, manifest, signature, archive) could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required file could not be read while computing the manifest.
    #[error("Failed to hash {}: {source}", path.display())]
    Hash {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed.
    ///
    /// For the descriptor and manifest this indicates a data defect and is never retried.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The PKCS#12 certificate bundle could not be read from disk.
    #[error("Failed to read certificate {}: {source}", path.display())]
    CertificateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The certificate bundle is not a valid PKCS#12 container.
    #[error("Invalid PKCS#12 container: {0}")]
    Pkcs12Parse(String),

    /// The PKCS#12 container could not be decrypted, usually a wrong passphrase.
    #[error("Failed to decrypt PKCS#12 container (wrong passphrase?): {0}")]
    Pkcs12Decrypt(String),

    /// The PKCS#12 container is encrypted with an algorithm the linked OpenSSL refuses.
    ///
    /// Typical of legacy RC2-40 exports under OpenSSL 3 without the legacy provider.
    #[error("PKCS#12 container uses an unsupported algorithm (re-export with AES or enable the legacy provider): {0}")]
    Pkcs12Unsupported(String),

    /// The PKCS#12 container holds no certificate.
    #[error("No certificate in PKCS#12 container")]
    MissingCertificate,

    /// The PKCS#12 container holds no private key.
    #[error("No private key in PKCS#12 container")]
    MissingPrivateKey,

    /// The private key does not belong to the certificate.
    #[error("Private key does not match certificate public key")]
    KeyMismatch,

    /// The intermediate certificate could not be read or parsed.
    #[error("Invalid intermediate certificate {}: {message}", path.display())]
    IntermediateCertificate { path: PathBuf, message: String },

    /// The signing library failed to produce a signature.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The S/MIME output does not have the expected envelope shape.
    #[error("Malformed signature envelope: {0}")]
    SignatureEnvelope(String),

    /// The base64 payload of the signature envelope did not decode.
    #[error("Failed to decode signature payload: {0}")]
    SignatureDecode(#[from] base64::DecodeError),

    /// The output archive could not be created.
    #[error("Failed to create archive {}: {source}", path.display())]
    ArchiveCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An entry could not be added to the archive.
    #[error("Failed to add {name} to archive: {source}")]
    ArchiveEntry {
        name: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// The archive could not be finalized.
    #[error("Failed to finalize archive: {0}")]
    ArchiveFinish(#[source] zip::result::ZipError),

    /// An existing package failed verification.
    #[error("Package verification failed: {0}")]
    Verification(String),

    /// I/O operation failed outside the named pipeline steps.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_variants_name_the_path() {
        let err = Error::IconCopy {
            path: PathBuf::from("/icons/icon_16x16.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/icons/icon_16x16.png"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_read_file_names_the_path() {
        let err = Error::ReadFile {
            path: PathBuf::from("/etc/pushpkg.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/etc/pushpkg.json"));
    }

    #[test]
    fn test_credential_errors_are_distinct() {
        let decrypt = Error::Pkcs12Decrypt("mac verify failure".into()).to_string();
        let parse = Error::Pkcs12Parse("asn1 error".into()).to_string();
        let unsupported = Error::Pkcs12Unsupported("unsupported".into()).to_string();
        assert!(decrypt.contains("passphrase"));
        assert!(!parse.contains("passphrase"));
        assert!(!unsupported.contains("passphrase"));
        assert_ne!(
            Error::MissingCertificate.to_string(),
            Error::MissingPrivateKey.to_string()
        );
    }
}
