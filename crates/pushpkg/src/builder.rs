//! PushPackage entry point
//!
//! Ties configuration, staging, hashing, signing and archiving together into
//! the single `create_push_package` operation.

use crate::config::PushPackageConfig;
use crate::crypto::signature;
use crate::manifest::compute_manifest;
use crate::package::{create_archive, create_staging_directory, stage_files};
use crate::website::WebsiteDescriptor;
use crate::Result;
use log::{debug, info};
use std::path::PathBuf;

/// Push package generator.
///
/// Holds a validated [`PushPackageConfig`] and builds one signed archive per
/// call. Calls share no mutable state, so one `PushPackage` can serve
/// concurrent requests from several threads.
///
/// # Example
///
/// ```no_run
/// use pushpkg::{IconSet, PushPackage, PushPackageConfig};
///
/// let config = PushPackageConfig::builder()
///     .website_name("Example")
///     .website_push_id("web.com.example")
///     .allowed_domain("https://example.com")
///     .url_format_string("https://example.com/%@")
///     .web_service_url("https://push.example.com")
///     .icons(IconSet::from_dir("icons"))
///     .certificate("push.p12")
///     .password("secret")
///     .build()?;
///
/// let archive = PushPackage::new(config).create_push_package("user-token")?;
/// println!("{}", archive.display());
/// # Ok::<(), pushpkg::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PushPackage {
    config: PushPackageConfig,
}

impl PushPackage {
    pub fn new(config: PushPackageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PushPackageConfig {
        &self.config
    }

    /// Build and sign a push package for one user.
    ///
    /// Steps, each aborting the whole call on failure:
    /// 1. Pad the token and encode `website.json`
    /// 2. Create a fresh staging directory
    /// 3. Copy the icons and write `website.json`
    /// 4. Hash the required files into `manifest.json`
    /// 5. Sign the manifest into `signature` (DER)
    /// 6. Zip everything into `<staging dir>.zip`
    ///
    /// Returns the archive path. The staging directory and archive are left
    /// on disk; see [`crate::cleanup::reap_staging`].
    ///
    /// # Errors
    ///
    /// Any [`crate::Error`] raised by the steps above. No archive path is
    /// returned unless every step succeeded.
    pub fn create_push_package(&self, authentication_token: &str) -> Result<PathBuf> {
        let descriptor = WebsiteDescriptor::new(&self.config, authentication_token)?;
        let website_json = descriptor.to_json()?;

        let staging_dir = create_staging_directory(self.config.temp_dir())?;

        stage_files(&staging_dir, self.config.icons(), &website_json)?;

        let manifest = compute_manifest(&staging_dir)?;
        debug!("manifest covers {} files", manifest.len());

        signature::sign(
            &staging_dir,
            self.config.certificate(),
            self.config.password(),
            self.config.intermediate_certificate(),
        )?;

        let archive = create_archive(&staging_dir, self.config.compression_level())?;

        info!(
            "built push package for {} at {}",
            self.config.website_push_id(),
            archive.display()
        );
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IconSet;
    use crate::Error;
    use tempfile::TempDir;

    fn config(temp: &std::path::Path) -> PushPackageConfig {
        PushPackageConfig::builder()
            .website_name("Example")
            .website_push_id("web.com.example")
            .allowed_domain("https://example.com")
            .url_format_string("https://example.com/%@")
            .web_service_url("https://push.example.com")
            .icons(IconSet::from_dir(temp.join("icons")))
            .certificate(temp.join("push.p12"))
            .temp_dir(temp.join("work"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_empty_token_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let package = PushPackage::new(config(temp_dir.path()));

        let result = package.create_push_package("");
        assert!(matches!(result, Err(Error::EmptyAuthenticationToken)));
        assert!(!temp_dir.path().join("work").exists());
    }

    #[test]
    fn test_missing_icons_fail_before_signing() {
        let temp_dir = TempDir::new().unwrap();
        let package = PushPackage::new(config(temp_dir.path()));

        let result = package.create_push_package("abcd");
        assert!(matches!(result, Err(Error::IconCopy { .. })));
    }

    #[test]
    fn test_push_package_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PushPackage>();
    }
}
