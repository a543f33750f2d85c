//! Signing certificate and private key loading.
//!
//! Credentials come from a password-protected PKCS#12 bundle, optionally
//! chained through a PEM intermediate certificate. Each stage of loading maps
//! to its own error so a bad passphrase, a corrupt file, and a bundle without
//! a key can be told apart.

use crate::{Error, Result};
use log::debug;
use openssl::error::ErrorStack;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::x509::X509;
use secrecy::{ExposeSecret, SecretString};
use std::fs;
use std::path::Path;

/// Certificate, private key and extra chain certificates used to sign a manifest.
///
/// The underlying OpenSSL handles are freed when this value is dropped, so
/// keep it scoped to the signing step.
pub struct PushCredentials {
    /// Signing certificate.
    pub certificate: X509,
    /// Private key matching `certificate`.
    pub private_key: PKey<Private>,
    /// Certificates embedded alongside the signer (intermediate first).
    pub chain: Vec<X509>,
}

impl PushCredentials {
    /// Load from a PKCS#12 (.p12) file.
    ///
    /// # Errors
    ///
    /// - [`Error::CertificateRead`] if the file cannot be read
    /// - [`Error::Pkcs12Parse`] if it is not PKCS#12
    /// - [`Error::Pkcs12Decrypt`] if the passphrase does not open it
    /// - [`Error::Pkcs12Unsupported`] if OpenSSL refuses its encryption algorithm
    /// - [`Error::MissingCertificate`] / [`Error::MissingPrivateKey`] if either is absent
    /// - [`Error::KeyMismatch`] if the key does not belong to the certificate
    /// - [`Error::IntermediateCertificate`] if the intermediate cannot be loaded
    pub fn from_p12(
        p12_path: &Path,
        password: &SecretString,
        intermediate: Option<&Path>,
    ) -> Result<Self> {
        let p12_data = fs::read(p12_path).map_err(|source| Error::CertificateRead {
            path: p12_path.to_path_buf(),
            source,
        })?;

        let mut credentials = Self::from_p12_der(&p12_data, password)?;

        if let Some(path) = intermediate {
            credentials.chain.insert(0, load_intermediate(path)?);
        }

        Ok(credentials)
    }

    /// Load from in-memory PKCS#12 DER bytes.
    pub fn from_p12_der(p12_data: &[u8], password: &SecretString) -> Result<Self> {
        let pkcs12 = Pkcs12::from_der(p12_data)
            .map_err(|e| Error::Pkcs12Parse(e.to_string()))?;

        let parsed = pkcs12
            .parse2(password.expose_secret())
            .map_err(decrypt_error)?;

        // OpenSSL only reports `cert` when it matches a key; an orphan
        // certificate lands in `ca`, so the key has to be checked first.
        let private_key = parsed.pkey.ok_or(Error::MissingPrivateKey)?;
        let certificate = parsed.cert.ok_or(Error::MissingCertificate)?;

        validate_key_pair(&certificate, &private_key)?;

        let chain: Vec<X509> = parsed
            .ca
            .map(|stack| stack.into_iter().collect())
            .unwrap_or_default();
        debug!("loaded PKCS#12 with {} bundled CA certificate(s)", chain.len());

        Ok(Self {
            certificate,
            private_key,
            chain,
        })
    }
}

fn decrypt_error(e: ErrorStack) -> Error {
    let unsupported = e
        .errors()
        .iter()
        .filter_map(|err| err.reason())
        .any(is_unsupported_reason);

    if unsupported {
        Error::Pkcs12Unsupported(e.to_string())
    } else {
        Error::Pkcs12Decrypt(e.to_string())
    }
}

fn is_unsupported_reason(reason: &str) -> bool {
    let reason = reason.to_ascii_lowercase();
    reason.contains("unsupported") || reason.contains("unknown cipher")
}

fn load_intermediate(path: &Path) -> Result<X509> {
    let data = fs::read(path).map_err(|e| Error::IntermediateCertificate {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    X509::from_pem(&data)
        .or_else(|_| X509::from_der(&data))
        .map_err(|e| Error::IntermediateCertificate {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
}

/// Validate that the private key matches the certificate's public key
fn validate_key_pair(cert: &X509, private_key: &PKey<Private>) -> Result<()> {
    let cert_public_key = cert
        .public_key()
        .map_err(|e| Error::Pkcs12Parse(format!("Certificate has no usable public key: {e}")))?;

    if !private_key.public_eq(&cert_public_key) {
        return Err(Error::KeyMismatch);
    }

    Ok(())
}
