//! Manifest signing.
//!
//! The consumer wants a raw DER PKCS#7 detached signature. OpenSSL's S/MIME
//! writer produces the signature wrapped in a multipart MIME message, so the
//! signer writes that envelope first and then rewrites the file with the
//! decoded DER payload.
//!
//! # Envelope format
//!
//! The envelope is accepted only in this shape:
//!
//! ```text
//! ...
//! Content-Disposition: attachment; filename="smime.p7s"
//! <further header lines>
//! <blank line>
//! <base64 lines>
//! <blank line>
//! ------<boundary>--
//! ```
//!
//! Anything else (no `Content-Disposition` header, no blank line after the
//! headers, an empty or non-base64 body, or a missing `------` delimiter) is
//! rejected with [`Error::SignatureEnvelope`].

use crate::crypto::PushCredentials;
use crate::manifest::{MANIFEST_FILE, SIGNATURE_FILE};
use crate::{Error, Result};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use log::debug;
use openssl::pkcs7::{Pkcs7, Pkcs7Flags};
use openssl::stack::Stack;
use openssl::x509::store::X509StoreBuilder;
use openssl::x509::X509;
use secrecy::SecretString;
use std::fs;
use std::path::Path;

const DISPOSITION_HEADER: &[u8] = b"Content-Disposition:";
const CLOSING_DELIMITER: &[u8] = b"------";

fn sign_flags() -> Pkcs7Flags {
    Pkcs7Flags::DETACHED | Pkcs7Flags::BINARY
}

/// Produce the S/MIME envelope of a detached, binary-mode PKCS#7 signature over `data`.
pub fn smime_sign(data: &[u8], credentials: &PushCredentials) -> Result<Vec<u8>> {
    let mut certs: Stack<X509> = Stack::new().map_err(|e| Error::Signing(e.to_string()))?;
    for cert in &credentials.chain {
        certs
            .push(cert.clone())
            .map_err(|e| Error::Signing(e.to_string()))?;
    }

    let pkcs7 = Pkcs7::sign(
        &credentials.certificate,
        &credentials.private_key,
        &certs,
        data,
        sign_flags(),
    )
    .map_err(|e| Error::Signing(format!("Failed to build PKCS#7 signature: {e}")))?;

    pkcs7
        .to_smime(data, sign_flags())
        .map_err(|e| Error::Signing(format!("Failed to write S/MIME output: {e}")))
}

/// Extract and decode the DER signature from an S/MIME envelope.
///
/// See the [module documentation](self) for the accepted shape.
pub fn smime_to_der(envelope: &[u8]) -> Result<Vec<u8>> {
    let mut lines = envelope
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line));

    if !lines.any(|line| line.starts_with(DISPOSITION_HEADER)) {
        return Err(Error::SignatureEnvelope(
            "no Content-Disposition header".into(),
        ));
    }

    if !lines.any(|line| line.is_empty()) {
        return Err(Error::SignatureEnvelope(
            "headers are not followed by a blank line".into(),
        ));
    }

    let mut body = Vec::new();
    let mut terminated = false;
    for line in lines.by_ref() {
        if line.is_empty() || line.starts_with(CLOSING_DELIMITER) {
            terminated = line.starts_with(CLOSING_DELIMITER);
            break;
        }
        if !line
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
        {
            return Err(Error::SignatureEnvelope(
                "body contains non-base64 characters".into(),
            ));
        }
        body.extend_from_slice(line);
    }

    if body.is_empty() {
        return Err(Error::SignatureEnvelope("empty signature body".into()));
    }

    if !terminated {
        terminated = lines
            .find(|line| !line.is_empty())
            .is_some_and(|line| line.starts_with(CLOSING_DELIMITER));
    }
    if !terminated {
        return Err(Error::SignatureEnvelope(
            "missing closing ------ delimiter".into(),
        ));
    }

    Ok(BASE64.decode(&body)?)
}

/// Load the PKCS#12 credentials and sign the manifest in `staging_dir`.
///
/// Credentials live only for the duration of this call.
pub fn sign(
    staging_dir: &Path,
    p12_path: &Path,
    password: &SecretString,
    intermediate: Option<&Path>,
) -> Result<()> {
    let credentials = PushCredentials::from_p12(p12_path, password, intermediate)?;
    sign_manifest(staging_dir, &credentials)
}

/// Sign `manifest.json` in `staging_dir` and leave the DER signature in `signature`.
///
/// The S/MIME envelope is written to `signature` first and then replaced in
/// place with the decoded DER bytes.
pub fn sign_manifest(staging_dir: &Path, credentials: &PushCredentials) -> Result<()> {
    let manifest_path = staging_dir.join(MANIFEST_FILE);
    let signature_path = staging_dir.join(SIGNATURE_FILE);

    let manifest = read_file(&manifest_path)?;

    let envelope = smime_sign(&manifest, credentials)?;
    write_file(&signature_path, &envelope)?;

    convert_signature_file(&signature_path)
}

/// Rewrite an S/MIME signature file as raw DER.
pub fn convert_signature_file(signature_path: &Path) -> Result<()> {
    let envelope = read_file(signature_path)?;
    let der = smime_to_der(&envelope)?;
    debug!(
        "converted signature envelope ({} bytes) to DER ({} bytes)",
        envelope.len(),
        der.len()
    );
    write_file(signature_path, &der)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).map_err(|source| Error::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Check a DER detached signature over `data`.
///
/// With a non-empty `trust` list the signer chain must lead to one of those
/// certificates; with an empty list only the signature itself is checked.
pub fn verify_detached(der: &[u8], data: &[u8], trust: &[X509]) -> Result<()> {
    let pkcs7 = Pkcs7::from_der(der)
        .map_err(|e| Error::Verification(format!("signature is not DER PKCS#7: {e}")))?;

    let mut store = X509StoreBuilder::new().map_err(|e| Error::Verification(e.to_string()))?;
    for cert in trust {
        store
            .add_cert(cert.clone())
            .map_err(|e| Error::Verification(e.to_string()))?;
    }
    let store = store.build();

    let mut flags = Pkcs7Flags::BINARY;
    if trust.is_empty() {
        flags |= Pkcs7Flags::NOVERIFY;
    }

    let certs: Stack<X509> = Stack::new().map_err(|e| Error::Verification(e.to_string()))?;
    pkcs7
        .verify(&certs, &store, Some(data), None, flags)
        .map_err(|e| Error::Verification(format!("signature does not verify: {e}")))
}
