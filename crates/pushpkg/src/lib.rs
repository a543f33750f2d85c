//! Build and sign Safari web push packages.
//!
//! A push package is a ZIP archive holding the site's icons, a `website.json`
//! descriptor, a `manifest.json` of SHA-1 digests and a detached PKCS#7
//! `signature` over that manifest. [`PushPackage::create_push_package`] runs
//! the whole pipeline for one user token.

pub mod builder;
pub mod cleanup;
pub mod config;
pub mod crypto;
pub mod error;
pub mod manifest;
pub mod package;
pub mod verify;
pub mod website;

pub use builder::PushPackage;
pub use cleanup::{reap_staging, ReapReport};
pub use config::{ConfigFile, IconSet, IconSlot, PushPackageConfig};
pub use crypto::PushCredentials;
pub use error::Error;
pub use manifest::{compute_manifest, Manifest, REQUIRED_FILES};
pub use package::CompressionLevel;
pub use verify::{verify_package, VerifiedPackage};
pub use website::WebsiteDescriptor;

pub type Result<T> = std::result::Result<T, Error>;
