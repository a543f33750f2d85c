//! Push package verification.
//!
//! Re-checks a finished archive the way a browser would: the entry set must
//! be exactly the nine package files, every manifest digest must match the
//! archived bytes, and the signature must verify over `manifest.json`.

use crate::crypto::verify_detached;
use crate::manifest::{
    package_entries, sha1_hex, Manifest, MANIFEST_FILE, SIGNATURE_FILE, WEBSITE_FILE,
};
use crate::website::WebsiteDescriptor;
use crate::{Error, Result};
use openssl::x509::X509;
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Contents of a package that passed verification.
#[derive(Debug, Clone)]
pub struct VerifiedPackage {
    pub website: WebsiteDescriptor,
    pub manifest: Manifest,
    /// Size of the DER signature in bytes.
    pub signature_len: usize,
}

/// Verify a push package archive.
///
/// `trust` lists the certificates the signer chain must lead to. Pass an
/// empty slice to check only that the signature matches the manifest.
///
/// # Errors
///
/// Returns [`Error::Verification`] naming the first failed check, or
/// [`Error::ReadFile`] if the archive cannot be opened.
pub fn verify_package(archive_path: impl AsRef<Path>, trust: &[X509]) -> Result<VerifiedPackage> {
    let archive_path = archive_path.as_ref();
    let file = File::open(archive_path).map_err(|source| Error::ReadFile {
        path: archive_path.to_path_buf(),
        source,
    })?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| Error::Verification(format!("not a ZIP archive: {e}")))?;

    let entries = read_entries(&mut archive)?;

    let expected: BTreeSet<&str> = package_entries().collect();
    let actual: BTreeSet<&str> = entries.keys().map(String::as_str).collect();
    if expected != actual {
        let missing: Vec<_> = expected.difference(&actual).collect();
        let extra: Vec<_> = actual.difference(&expected).collect();
        return Err(Error::Verification(format!(
            "unexpected entry set (missing {missing:?}, extra {extra:?})"
        )));
    }

    let manifest_bytes = &entries[MANIFEST_FILE];
    let manifest = Manifest::from_json(manifest_bytes)?;

    for (name, digest) in manifest.iter() {
        let hashed = sha1_hex(&entries[name]);
        if hashed != digest {
            return Err(Error::Verification(format!(
                "digest mismatch for {name}: manifest has {digest}, file hashes to {hashed}"
            )));
        }
    }

    let signature = &entries[SIGNATURE_FILE];
    verify_detached(signature, manifest_bytes, trust)?;

    let website = WebsiteDescriptor::from_json(&entries[WEBSITE_FILE])
        .map_err(|e| Error::Verification(format!("website.json is invalid: {e}")))?;

    Ok(VerifiedPackage {
        website,
        manifest,
        signature_len: signature.len(),
    })
}

/// Load PEM certificates to use as the `trust` argument of [`verify_package`].
pub fn load_trusted_certificates<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<X509>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let pem = fs::read(path).map_err(|source| Error::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
            X509::from_pem(&pem).map_err(|e| {
                Error::Verification(format!("{} is not a PEM certificate: {e}", path.display()))
            })
        })
        .collect()
}

fn read_entries(archive: &mut ZipArchive<File>) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut entries = BTreeMap::new();

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| Error::Verification(format!("unreadable entry #{i}: {e}")))?;
        let name = entry.name().to_string();

        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;

        if entries.insert(name.clone(), data).is_some() {
            return Err(Error::Verification(format!("duplicate entry {name}")));
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            std::io::Write::write_all(&mut zip, data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_load_trusted_certificates_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ca.pem");
        fs::write(&path, b"garbage").unwrap();

        let err = load_trusted_certificates(&[&path]).unwrap_err();
        assert!(matches!(err, Error::Verification(msg) if msg.contains("ca.pem")));
    }

    #[test]
    fn test_missing_archive_names_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.zip");

        let err = verify_package(&path, &[]).unwrap_err();
        assert!(matches!(err, Error::ReadFile { path: p, .. } if p == path));
    }

    #[test]
    fn test_rejects_non_zip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bogus.zip");
        fs::write(&path, b"not a zip").unwrap();

        assert!(matches!(verify_package(&path, &[]), Err(Error::Verification(_))));
    }

    #[test]
    fn test_rejects_wrong_entry_set() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.zip");
        write_zip(
            &path,
            &[("website.json", b"{}".as_slice()), ("extra.txt", b"x".as_slice())],
        );

        let err = verify_package(&path, &[]).unwrap_err();
        assert!(matches!(err, Error::Verification(msg) if msg.contains("extra.txt")));
    }

    #[test]
    fn test_rejects_digest_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mismatch.zip");

        let mut manifest = serde_json::Map::new();
        for name in crate::manifest::REQUIRED_FILES {
            manifest.insert(name.to_string(), sha1_hex(b"original").into());
        }
        let manifest = serde_json::to_vec(&manifest).unwrap();

        let mut entries: Vec<(&str, &[u8])> = crate::manifest::REQUIRED_FILES
            .iter()
            .map(|name| (*name, b"original".as_slice()))
            .collect();
        entries[0].1 = b"changed".as_slice();
        entries.push((MANIFEST_FILE, manifest.as_slice()));
        entries.push((SIGNATURE_FILE, b"\x30\x00".as_slice()));
        write_zip(&path, &entries);

        let err = verify_package(&path, &[]).unwrap_err();
        assert!(matches!(err, Error::Verification(msg) if msg.contains("icon_16x16.png")));
    }
}
