//! Manifest computation.
//!
//! The manifest maps every required package file to the lowercase hex SHA-1
//! of its bytes. The hash algorithm and the object encoding are fixed by the
//! consumer and are not configurable.

use crate::{Error, Result};
use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Website descriptor file name.
pub const WEBSITE_FILE: &str = "website.json";

/// Manifest file name.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Detached signature file name.
pub const SIGNATURE_FILE: &str = "signature";

/// Files every package must contain, in canonical order.
pub const REQUIRED_FILES: [&str; 7] = [
    "icon.iconset/icon_16x16.png",
    "icon.iconset/icon_16x16@2x.png",
    "icon.iconset/icon_32x32.png",
    "icon.iconset/icon_32x32@2x.png",
    "icon.iconset/icon_128x128.png",
    "icon.iconset/icon_128x128@2x.png",
    WEBSITE_FILE,
];

/// Every entry of a finished package in archive order.
pub fn package_entries() -> impl Iterator<Item = &'static str> {
    REQUIRED_FILES
        .into_iter()
        .chain([MANIFEST_FILE, SIGNATURE_FILE])
}

/// Relative file name to SHA-1 hex digest, in [`REQUIRED_FILES`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<(String, String)>,
}

impl Manifest {
    /// Hash every required file under `staging_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Hash`] naming the first file that is missing or unreadable.
    pub fn compute(staging_dir: &Path) -> Result<Self> {
        let mut entries = Vec::with_capacity(REQUIRED_FILES.len());

        for name in REQUIRED_FILES {
            let path = staging_dir.join(name);
            let digest = hash_file(&path)?;
            debug!("hashed {name}: {digest}");
            entries.push((name.to_string(), digest));
        }

        Ok(Self { entries })
    }

    /// Parse a serialized manifest, keeping the required-file order.
    ///
    /// Keys outside [`REQUIRED_FILES`] or missing required keys are rejected.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let mut map: BTreeMap<String, String> = serde_json::from_slice(data)?;

        let mut entries = Vec::with_capacity(REQUIRED_FILES.len());
        for name in REQUIRED_FILES {
            let digest = map
                .remove(name)
                .ok_or_else(|| Error::Verification(format!("manifest lacks {name}")))?;
            entries.push((name.to_string(), digest));
        }

        if let Some(extra) = map.keys().next() {
            return Err(Error::Verification(format!(
                "manifest lists unexpected file {extra}"
            )));
        }

        Ok(Self { entries })
    }

    /// Digest recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(file, _)| file == name)
            .map(|(_, digest)| digest.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, d)| (f.as_str(), d.as_str()))
    }

    /// Compact JSON object encoding.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Write `manifest.json` into `staging_dir`.
    pub fn write(&self, staging_dir: &Path) -> Result<()> {
        let path = staging_dir.join(MANIFEST_FILE);
        let json = self.to_json()?;
        fs::write(&path, json).map_err(|source| Error::WriteFile { path, source })
    }
}

// Always an object, even with zero entries.
impl Serialize for Manifest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (file, digest) in &self.entries {
            map.serialize_entry(file, digest)?;
        }
        map.end()
    }
}

/// Compute the manifest of `staging_dir` and write it to `manifest.json`.
pub fn compute_manifest(staging_dir: &Path) -> Result<Manifest> {
    let manifest = Manifest::compute(staging_dir)?;
    manifest.write(staging_dir)?;
    Ok(manifest)
}

/// Lowercase hex SHA-1 of `data`.
pub fn sha1_hex(data: &[u8]) -> String {
    hex::encode(Sha1::digest(data))
}

fn hash_file(path: &Path) -> Result<String> {
    let data = fs::read(path).map_err(|source| Error::Hash {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(sha1_hex(&data))
}
