//! Push package configuration.
//!
//! [`PushPackageConfig`] carries everything a package needs besides the
//! per-user authentication token: website metadata, the six icon sources,
//! the PKCS#12 signing bundle and where staging happens. It is built once
//! through [`PushPackageConfigBuilder`], validated up front, and is immutable
//! afterwards so it can be shared between concurrent packaging calls.
//!
//! # Examples
//!
//! ```no_run
//! use pushpkg::config::{IconSet, PushPackageConfig};
//!
//! let config = PushPackageConfig::builder()
//!     .website_name("Example")
//!     .website_push_id("web.com.example")
//!     .allowed_domain("https://example.com")
//!     .url_format_string("https://example.com/%@")
//!     .web_service_url("https://push.example.com/")
//!     .icons(IconSet::from_dir("assets/icons"))
//!     .certificate("certs/push.p12")
//!     .password("secret")
//!     .build()?;
//! # Ok::<(), pushpkg::Error>(())
//! ```

use crate::package::CompressionLevel;
use crate::{Error, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Directory inside the package that holds the icons.
pub const ICONSET_DIR: &str = "icon.iconset";

/// Placeholder the platform substitutes with per-notification arguments.
pub const URL_PLACEHOLDER: &str = "%@";

/// One of the six icon sizes a push package must ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IconSlot {
    Icon16,
    Icon16At2x,
    Icon32,
    Icon32At2x,
    Icon128,
    Icon128At2x,
}

impl IconSlot {
    /// All slots in canonical package order.
    pub const ALL: [IconSlot; 6] = [
        IconSlot::Icon16,
        IconSlot::Icon16At2x,
        IconSlot::Icon32,
        IconSlot::Icon32At2x,
        IconSlot::Icon128,
        IconSlot::Icon128At2x,
    ];

    /// Canonical file name inside `icon.iconset/`.
    pub fn file_name(self) -> &'static str {
        match self {
            IconSlot::Icon16 => "icon_16x16.png",
            IconSlot::Icon16At2x => "icon_16x16@2x.png",
            IconSlot::Icon32 => "icon_32x32.png",
            IconSlot::Icon32At2x => "icon_32x32@2x.png",
            IconSlot::Icon128 => "icon_128x128.png",
            IconSlot::Icon128At2x => "icon_128x128@2x.png",
        }
    }

    /// Relative path of this icon inside the package, e.g. `icon.iconset/icon_16x16.png`.
    pub fn package_path(self) -> String {
        format!("{}/{}", ICONSET_DIR, self.file_name())
    }

    /// Looks up a slot by its canonical file name.
    pub fn from_file_name(name: &str) -> Option<IconSlot> {
        Self::ALL.into_iter().find(|slot| slot.file_name() == name)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Source paths for the six package icons, one per [`IconSlot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSet {
    paths: [PathBuf; 6],
}

impl IconSet {
    /// Creates an icon set from six paths given in [`IconSlot::ALL`] order.
    pub fn new(paths: [PathBuf; 6]) -> Self {
        Self { paths }
    }

    /// Resolves every canonical icon file name inside `dir`.
    ///
    /// The files are not checked here; a missing icon surfaces as
    /// [`Error::IconCopy`] when the package is staged.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            paths: IconSlot::ALL.map(|slot| dir.join(slot.file_name())),
        }
    }

    /// Builds an icon set from a map keyed by canonical file name.
    ///
    /// Fails unless the map names each of the six icons exactly once.
    pub fn from_named<K: AsRef<str>>(named: impl IntoIterator<Item = (K, PathBuf)>) -> Result<Self> {
        let mut slots: [Option<PathBuf>; 6] = Default::default();

        for (name, path) in named {
            let name = name.as_ref();
            let slot = IconSlot::from_file_name(name)
                .ok_or_else(|| Error::Config(format!("Unknown icon name {name:?}")))?;
            if slots[slot.index()].replace(path).is_some() {
                return Err(Error::Config(format!("Icon {name:?} given twice")));
            }
        }

        let mut paths: [PathBuf; 6] = Default::default();
        for slot in IconSlot::ALL {
            paths[slot.index()] = slots[slot.index()]
                .take()
                .ok_or_else(|| Error::Config(format!("Missing icon {:?}", slot.file_name())))?;
        }

        Ok(Self { paths })
    }

    /// Source path configured for `slot`.
    pub fn path(&self, slot: IconSlot) -> &Path {
        &self.paths[slot.index()]
    }

    /// Iterates `(slot, source path)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (IconSlot, &Path)> + '_ {
        IconSlot::ALL.into_iter().map(move |slot| (slot, self.path(slot)))
    }

    fn rebase(self, base: &Path) -> Self {
        Self {
            paths: self.paths.map(|p| resolve(base, p)),
        }
    }
}

/// Validated, immutable push package configuration.
///
/// Construct through [`PushPackageConfig::builder`]. Cloning is cheap enough
/// to hand one copy to each worker, but a shared reference works as well
/// since nothing here is mutated after `build()`.
#[derive(Debug, Clone)]
pub struct PushPackageConfig {
    website_name: String,
    website_push_id: String,
    allowed_domains: Vec<String>,
    url_format_string: String,
    web_service_url: String,
    icons: IconSet,
    certificate: PathBuf,
    password: SecretString,
    intermediate_certificate: Option<PathBuf>,
    temp_dir: PathBuf,
    compression_level: CompressionLevel,
}

impl PushPackageConfig {
    /// Start building a configuration.
    pub fn builder() -> PushPackageConfigBuilder {
        PushPackageConfigBuilder::default()
    }

    pub fn website_name(&self) -> &str {
        &self.website_name
    }

    pub fn website_push_id(&self) -> &str {
        &self.website_push_id
    }

    pub fn allowed_domains(&self) -> &[String] {
        &self.allowed_domains
    }

    pub fn url_format_string(&self) -> &str {
        &self.url_format_string
    }

    /// Web-service base URL with trailing slashes removed.
    pub fn web_service_url(&self) -> &str {
        &self.web_service_url
    }

    pub fn icons(&self) -> &IconSet {
        &self.icons
    }

    /// Path to the PKCS#12 bundle holding the signing certificate and key.
    pub fn certificate(&self) -> &Path {
        &self.certificate
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }

    /// Path to the PEM intermediate certificate, if one is chained.
    pub fn intermediate_certificate(&self) -> Option<&Path> {
        self.intermediate_certificate.as_deref()
    }

    /// Root under which staging directories and archives are created.
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn compression_level(&self) -> CompressionLevel {
        self.compression_level
    }
}

/// Builder for [`PushPackageConfig`].
///
/// Setters only record values; [`build`](Self::build) performs all validation.
#[derive(Default)]
pub struct PushPackageConfigBuilder {
    website_name: Option<String>,
    website_push_id: Option<String>,
    allowed_domains: Vec<String>,
    url_format_string: Option<String>,
    web_service_url: Option<String>,
    icons: Option<IconSet>,
    certificate: Option<PathBuf>,
    password: Option<SecretString>,
    intermediate_certificate: Option<PathBuf>,
    temp_dir: Option<PathBuf>,
    compression_level: CompressionLevel,
}

impl PushPackageConfigBuilder {
    /// Name shown to the user in the permission prompt.
    pub fn website_name(mut self, name: impl Into<String>) -> Self {
        self.website_name = Some(name.into());
        self
    }

    /// Website push identifier, e.g. `web.com.example`.
    pub fn website_push_id(mut self, id: impl Into<String>) -> Self {
        self.website_push_id = Some(id.into());
        self
    }

    /// Add one origin allowed to request permission.
    pub fn allowed_domain(mut self, domain: impl Into<String>) -> Self {
        self.allowed_domains.push(domain.into());
        self
    }

    /// Add several allowed origins.
    pub fn allowed_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_domains.extend(domains.into_iter().map(Into::into));
        self
    }

    /// Landing URL template; `%@` marks where notification arguments go.
    pub fn url_format_string(mut self, template: impl Into<String>) -> Self {
        self.url_format_string = Some(template.into());
        self
    }

    /// Base URL of the web service the browser calls back.
    pub fn web_service_url(mut self, url: impl Into<String>) -> Self {
        self.web_service_url = Some(url.into());
        self
    }

    pub fn icons(mut self, icons: IconSet) -> Self {
        self.icons = Some(icons);
        self
    }

    /// Set PKCS#12 file path (.p12 format).
    pub fn certificate(mut self, path: impl AsRef<Path>) -> Self {
        self.certificate = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the PKCS#12 passphrase.
    ///
    /// The password is stored securely and will be zeroized when dropped.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::new(password.into()));
        self
    }

    /// Set the PEM intermediate certificate to chain through.
    pub fn intermediate_certificate(mut self, path: impl AsRef<Path>) -> Self {
        self.intermediate_certificate = Some(path.as_ref().to_path_buf());
        self
    }

    /// Root for staging directories. Defaults to the OS temp directory.
    pub fn temp_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.temp_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set ZIP compression level for the archive (0-9).
    pub fn compression_level(mut self, level: u32) -> Self {
        self.compression_level = CompressionLevel::new(level);
        self
    }

    /// Validate every field and produce the immutable configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidWebsitePushId`] if the ID is not `web.<label>(.<label>)*`
    /// - [`Error::NoAllowedDomains`] / [`Error::InvalidAllowedDomain`] for the origin list
    /// - [`Error::InvalidUrlFormatString`] if the template is not http(s)
    /// - [`Error::InvalidWebServiceUrl`] if the web-service URL does not parse
    /// - [`Error::Config`] for any other missing value
    pub fn build(self) -> Result<PushPackageConfig> {
        let website_name = required(self.website_name, "website name")?;
        if website_name.trim().is_empty() {
            return Err(Error::Config("Website name must not be empty".into()));
        }

        let website_push_id = required(self.website_push_id, "website push ID")?;
        validate_website_push_id(&website_push_id)?;

        validate_allowed_domains(&self.allowed_domains)?;

        let url_format_string = required(self.url_format_string, "URL format string")?;
        validate_url_format_string(&url_format_string)?;

        let web_service_url = required(self.web_service_url, "web service URL")?;
        let web_service_url = normalize_web_service_url(&web_service_url)?;

        let icons = self
            .icons
            .ok_or_else(|| Error::Config("Icons are required".into()))?;

        let certificate = self
            .certificate
            .ok_or_else(|| Error::Config("Certificate path is required".into()))?;

        let temp_dir = self.temp_dir.unwrap_or_else(std::env::temp_dir);
        if temp_dir.as_os_str().is_empty() {
            return Err(Error::Config("Temporary directory must not be empty".into()));
        }

        Ok(PushPackageConfig {
            website_name,
            website_push_id,
            allowed_domains: self.allowed_domains,
            url_format_string,
            web_service_url,
            icons,
            certificate,
            password: self
                .password
                .unwrap_or_else(|| SecretString::new(String::new())),
            intermediate_certificate: self.intermediate_certificate,
            temp_dir,
            compression_level: self.compression_level,
        })
    }
}

fn required(value: Option<String>, what: &str) -> Result<String> {
    value.ok_or_else(|| Error::Config(format!("Missing {what}")))
}

/// Checks `web.<label>(.<label>)*` with non-empty labels.
pub fn validate_website_push_id(id: &str) -> Result<()> {
    let invalid = || Error::InvalidWebsitePushId(id.to_string());

    let rest = id.strip_prefix("web.").ok_or_else(invalid)?;
    let well_formed = rest.split('.').all(|label| {
        !label.is_empty()
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    });

    if well_formed {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Checks the origin list is non-empty and every entry is an absolute URL with a host.
pub fn validate_allowed_domains(domains: &[String]) -> Result<()> {
    if domains.is_empty() {
        return Err(Error::NoAllowedDomains);
    }

    for domain in domains {
        let parsed =
            Url::parse(domain).map_err(|_| Error::InvalidAllowedDomain(domain.clone()))?;
        if parsed.host_str().is_none() {
            return Err(Error::InvalidAllowedDomain(domain.clone()));
        }
    }

    Ok(())
}

pub fn validate_url_format_string(template: &str) -> Result<()> {
    if template.starts_with("http://") || template.starts_with("https://") {
        Ok(())
    } else {
        Err(Error::InvalidUrlFormatString(template.to_string()))
    }
}

/// Strips trailing slashes and checks the result is an absolute http(s) URL.
pub fn normalize_web_service_url(url: &str) -> Result<String> {
    let trimmed = url.trim_end_matches('/');
    let invalid = || Error::InvalidWebServiceUrl(url.to_string());

    let parsed = Url::parse(trimmed).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(invalid());
    }

    Ok(trimmed.to_string())
}

/// Icon sources as written in a configuration file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IconSource {
    /// Directory holding the six canonically named icons.
    Directory(PathBuf),
    /// Explicit map from canonical file name to source path.
    Files(BTreeMap<String, PathBuf>),
}

/// On-disk JSON configuration.
///
/// Keys mirror `website.json` where they overlap. Relative paths are resolved
/// against the directory containing the configuration file.
///
/// ```json
/// {
///   "websiteName": "Example",
///   "websitePushID": "web.com.example",
///   "allowedDomains": ["https://example.com"],
///   "urlFormatString": "https://example.com/%@",
///   "webServiceURL": "https://push.example.com",
///   "icons": "icons",
///   "certificatePath": "push.p12",
///   "certificatePasswordEnv": "PUSH_P12_PASSWORD"
/// }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    pub website_name: String,
    #[serde(rename = "websitePushID")]
    pub website_push_id: String,
    pub allowed_domains: Vec<String>,
    pub url_format_string: String,
    #[serde(rename = "webServiceURL")]
    pub web_service_url: String,
    pub icons: IconSource,
    pub certificate_path: PathBuf,
    #[serde(default)]
    pub certificate_password: Option<String>,
    #[serde(default)]
    pub certificate_password_env: Option<String>,
    #[serde(default)]
    pub intermediate_certificate_path: Option<PathBuf>,
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
    #[serde(default)]
    pub compression_level: Option<u32>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl ConfigFile {
    /// Read and parse a JSON configuration file.
    ///
    /// Fails with [`Error::ReadFile`] naming `path` if it cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut file: ConfigFile = serde_json::from_slice(&data)?;
        file.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(file)
    }

    /// Parse a configuration from a JSON string; relative paths resolve against `base_dir`.
    pub fn from_json(json: &str, base_dir: impl AsRef<Path>) -> Result<Self> {
        let mut file: ConfigFile = serde_json::from_str(json)?;
        file.base_dir = base_dir.as_ref().to_path_buf();
        Ok(file)
    }

    /// Run the file contents through [`PushPackageConfigBuilder::build`].
    pub fn into_config(self) -> Result<PushPackageConfig> {
        let base = self.base_dir;

        let icons = match self.icons {
            IconSource::Directory(dir) => IconSet::from_dir(resolve(&base, dir)),
            IconSource::Files(files) => IconSet::from_named(files)?.rebase(&base),
        };

        let password = match (self.certificate_password, self.certificate_password_env) {
            (Some(_), Some(_)) => {
                return Err(Error::Config(
                    "Cannot specify both certificatePassword and certificatePasswordEnv".into(),
                ))
            }
            (Some(password), None) => password,
            (None, Some(var)) => std::env::var(&var).map_err(|_| {
                Error::Config(format!("Environment variable {var} is not set"))
            })?,
            (None, None) => String::new(),
        };

        let mut builder = PushPackageConfig::builder()
            .website_name(self.website_name)
            .website_push_id(self.website_push_id)
            .allowed_domains(self.allowed_domains)
            .url_format_string(self.url_format_string)
            .web_service_url(self.web_service_url)
            .icons(icons)
            .certificate(resolve(&base, self.certificate_path))
            .password(password);

        if let Some(intermediate) = self.intermediate_certificate_path {
            builder = builder.intermediate_certificate(resolve(&base, intermediate));
        }
        if let Some(temp_dir) = self.temp_dir {
            builder = builder.temp_dir(resolve(&base, temp_dir));
        }
        if let Some(level) = self.compression_level {
            builder = builder.compression_level(level);
        }

        builder.build()
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn valid_builder() -> PushPackageConfigBuilder {
        PushPackageConfig::builder()
            .website_name("Example")
            .website_push_id("web.com.example.test")
            .allowed_domain("https://example.com")
            .url_format_string("https://example.com/a?id=%@")
            .web_service_url("https://push.example.com//")
            .icons(IconSet::from_dir("/icons"))
            .certificate("/certs/push.p12")
            .password("secret")
            .temp_dir("/tmp/pushpkg")
    }

    #[test]
    fn test_valid_config_builds() {
        let config = valid_builder().build().unwrap();
        assert_eq!(config.website_push_id(), "web.com.example.test");
        assert_eq!(config.web_service_url(), "https://push.example.com");
        assert_eq!(config.password().expose_secret(), "secret");
        assert_eq!(config.compression_level().level(), 6);
        assert!(config.intermediate_certificate().is_none());
    }

    #[test]
    fn test_push_id_requires_web_prefix_and_segment() {
        for bad in ["com.example", "web", "web.", "web..example", "webcom.example", "web.exa mple"] {
            let result = valid_builder().website_push_id(bad).build();
            assert!(
                matches!(result, Err(Error::InvalidWebsitePushId(_))),
                "{bad} should be rejected"
            );
        }
        assert!(validate_website_push_id("web.example").is_ok());
        assert!(validate_website_push_id("web.com.my-site_1").is_ok());
    }

    #[test]
    fn test_empty_allowed_domains_rejected() {
        let result = PushPackageConfig::builder()
            .website_name("Example")
            .website_push_id("web.com.example")
            .url_format_string("https://example.com/%@")
            .web_service_url("https://push.example.com")
            .icons(IconSet::from_dir("/icons"))
            .certificate("/certs/push.p12")
            .build();
        assert!(matches!(result, Err(Error::NoAllowedDomains)));
    }

    #[test]
    fn test_invalid_allowed_domain_rejected() {
        let result = valid_builder().allowed_domain("example.com").build();
        assert!(matches!(result, Err(Error::InvalidAllowedDomain(d)) if d == "example.com"));
    }

    #[test]
    fn test_url_format_string_requires_http_scheme() {
        let result = valid_builder().url_format_string("example.com/%@").build();
        assert!(matches!(result, Err(Error::InvalidUrlFormatString(_))));

        let result = valid_builder().url_format_string("ftp://example.com/%@").build();
        assert!(matches!(result, Err(Error::InvalidUrlFormatString(_))));

        assert!(valid_builder().url_format_string("http://example.com/%@").build().is_ok());
    }

    #[test]
    fn test_web_service_url_validation() {
        assert_eq!(
            normalize_web_service_url("https://push.example.com/v1///").unwrap(),
            "https://push.example.com/v1"
        );
        assert!(matches!(
            normalize_web_service_url("not a url"),
            Err(Error::InvalidWebServiceUrl(_))
        ));
        assert!(matches!(
            normalize_web_service_url("ftp://push.example.com"),
            Err(Error::InvalidWebServiceUrl(_))
        ));
    }

    #[test]
    fn test_missing_certificate_is_config_error() {
        let result = PushPackageConfig::builder()
            .website_name("Example")
            .website_push_id("web.com.example")
            .allowed_domain("https://example.com")
            .url_format_string("https://example.com/%@")
            .web_service_url("https://push.example.com")
            .icons(IconSet::from_dir("/icons"))
            .build();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("Certificate")));
    }

    #[test]
    fn test_icon_set_from_dir_uses_canonical_names() {
        let icons = IconSet::from_dir("/assets");
        assert_eq!(
            icons.path(IconSlot::Icon128At2x),
            Path::new("/assets/icon_128x128@2x.png")
        );
        assert_eq!(icons.iter().count(), 6);
        assert_eq!(IconSlot::Icon32.package_path(), "icon.iconset/icon_32x32.png");
    }

    #[test]
    fn test_icon_set_from_named_requires_all_six() {
        let mut named: Vec<(&str, PathBuf)> = IconSlot::ALL
            .iter()
            .map(|slot| (slot.file_name(), PathBuf::from(format!("/x/{}", slot.file_name()))))
            .collect();
        assert!(IconSet::from_named(named.clone()).is_ok());

        named.pop();
        assert!(matches!(IconSet::from_named(named.clone()), Err(Error::Config(_))));

        named.push(("icon_64x64.png", PathBuf::from("/x/big.png")));
        assert!(matches!(IconSet::from_named(named), Err(Error::Config(msg)) if msg.contains("Unknown")));
    }

    #[test]
    fn test_config_file_resolves_relative_paths() {
        let json = r#"{
            "websiteName": "Example",
            "websitePushID": "web.com.example",
            "allowedDomains": ["https://example.com"],
            "urlFormatString": "https://example.com/%@",
            "webServiceURL": "https://push.example.com/",
            "icons": "icons",
            "certificatePath": "push.p12",
            "certificatePassword": "pw",
            "intermediateCertificatePath": "/etc/ssl/intermediate.pem",
            "compressionLevel": 0
        }"#;

        let config = ConfigFile::from_json(json, "/srv/push").unwrap().into_config().unwrap();
        assert_eq!(config.certificate(), Path::new("/srv/push/push.p12"));
        assert_eq!(
            config.icons().path(IconSlot::Icon16),
            Path::new("/srv/push/icons/icon_16x16.png")
        );
        assert_eq!(
            config.intermediate_certificate(),
            Some(Path::new("/etc/ssl/intermediate.pem"))
        );
        assert_eq!(config.compression_level().level(), 0);
        assert_eq!(config.web_service_url(), "https://push.example.com");
    }

    #[test]
    fn test_config_file_rejects_both_password_sources() {
        let json = r#"{
            "websiteName": "Example",
            "websitePushID": "web.com.example",
            "allowedDomains": ["https://example.com"],
            "urlFormatString": "https://example.com/%@",
            "webServiceURL": "https://push.example.com",
            "icons": "icons",
            "certificatePath": "push.p12",
            "certificatePassword": "pw",
            "certificatePasswordEnv": "PUSHPKG_TEST_UNUSED"
        }"#;

        let result = ConfigFile::from_json(json, "/srv").unwrap().into_config();
        assert!(matches!(result, Err(Error::Config(msg)) if msg.contains("both")));
    }

    #[test]
    fn test_config_file_load_missing_names_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("pushpkg.json");

        let result = ConfigFile::load(&path);
        assert!(matches!(result, Err(Error::ReadFile { path: p, .. }) if p == path));
    }

    #[test]
    fn test_config_file_rejects_unknown_keys() {
        let json = r#"{"websiteName": "x", "bogus": true}"#;
        assert!(matches!(ConfigFile::from_json(json, "/"), Err(Error::Json(_))));
    }
}
