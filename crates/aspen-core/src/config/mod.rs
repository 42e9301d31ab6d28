//! Website configuration schema.
//!
//! [`WebsiteConfig`] holds every attribute configuration functions may read
//! or change before the website starts serving. Values come from the
//! documented defaults, overlaid with `ASPEN_*` environment variables via the
//! `config` crate. Files are never consulted.

pub mod address;
pub mod logging;
pub mod mode;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

pub use self::address::NetworkAddress;
pub use self::logging::LogFormat;
pub use self::mode::Mode;

use crate::error::AppError;
use crate::result::AppResult;

/// Prefix of the environment variables read by [`WebsiteConfig::from_env`].
pub const ENV_PREFIX: &str = "ASPEN";

/// Format of the `Retry-After` header value (RFC 7231 IMF-fixdate).
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Process-wide website configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebsiteConfig {
    /// Restart the process when source files change.
    #[serde(default)]
    pub changes_reload: bool,
    /// Charset for dynamic resources.
    #[serde(default = "default_charset_dynamic")]
    pub charset_dynamic: String,
    /// Charset for static resources; `None` leaves it unspecified.
    #[serde(default)]
    pub charset_static: Option<String>,
    /// Configuration scripts run at startup, in order.
    #[serde(default, deserialize_with = "deserialize_path_list")]
    pub configuration_scripts: Vec<PathBuf>,
    /// Filenames tried, in order, when a directory is requested.
    #[serde(default = "default_indices", deserialize_with = "deserialize_name_list")]
    pub indices: Vec<String>,
    /// Render a listing for directories without an index.
    #[serde(default)]
    pub list_directories: bool,
    /// Verbosity threshold; lower is noisier.
    #[serde(default)]
    pub logging_threshold: i32,
    /// Only emit events whose target starts with this path; empty keeps all.
    #[serde(default)]
    pub log_filter: String,
    /// Output format of the log subscriber.
    #[serde(default)]
    pub log_format: LogFormat,
    /// Media type for resources whose type cannot be guessed.
    #[serde(default = "default_media_type_default")]
    pub media_type_default: String,
    /// Media type used for JSON responses.
    #[serde(default = "default_media_type_json")]
    pub media_type_json: String,
    /// Identifier of the network engine serving requests.
    #[serde(default = "default_network_engine")]
    pub network_engine: String,
    /// Address the network engine binds to.
    #[serde(default)]
    pub network_address: NetworkAddress,
    /// Directory holding project code outside the web root.
    #[serde(default)]
    pub project_root: Option<PathBuf>,
    /// Identifier of the default template renderer.
    #[serde(default = "default_renderer_default")]
    pub renderer_default: String,
    /// Include tracebacks in error responses.
    #[serde(default)]
    pub show_tracebacks: bool,
    /// Root publishing directory; the working directory when `None`.
    #[serde(default)]
    pub www_root: Option<PathBuf>,
    /// Minutes the website reports itself unavailable; 0 disables.
    #[serde(default)]
    pub unavailable: u32,
    /// Deployment mode.
    #[serde(default)]
    pub mode: Mode,
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        Self {
            changes_reload: false,
            charset_dynamic: default_charset_dynamic(),
            charset_static: None,
            configuration_scripts: Vec::new(),
            indices: default_indices(),
            list_directories: false,
            logging_threshold: 0,
            log_filter: String::new(),
            log_format: LogFormat::default(),
            media_type_default: default_media_type_default(),
            media_type_json: default_media_type_json(),
            network_engine: default_network_engine(),
            network_address: NetworkAddress::default(),
            project_root: None,
            renderer_default: default_renderer_default(),
            show_tracebacks: false,
            www_root: None,
            unavailable: 0,
            mode: Mode::default(),
        }
    }
}

impl WebsiteConfig {
    /// Load configuration from the process environment.
    ///
    /// Every attribute may be overridden by an `ASPEN_<ATTRIBUTE>` variable,
    /// e.g. `ASPEN_NETWORK_ADDRESS=:9000` or `ASPEN_INDICES="index.html, default.html"`.
    ///
    /// The result is not validated: overlay command-line overrides first,
    /// then call [`WebsiteConfig::validate`].
    pub fn from_env() -> AppResult<Self> {
        Self::load(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load configuration from an explicit set of `ASPEN_*` variables.
    ///
    /// Like [`WebsiteConfig::from_env`], the result is not validated.
    pub fn from_vars<I, K, V>(vars: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: config::Map<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::load(config::Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load(environment: config::Environment) -> AppResult<Self> {
        let config = config::Config::builder()
            .add_source(environment.try_parsing(true))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let website: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        debug!(
            address = %website.network_address,
            mode = %website.mode,
            unavailable = website.unavailable,
            "Website configuration loaded"
        );
        Ok(website)
    }

    /// Check cross-field constraints the type system does not capture.
    pub fn validate(&self) -> AppResult<()> {
        if self.charset_dynamic.trim().is_empty() {
            return Err(AppError::configuration("charset_dynamic must not be empty"));
        }
        if let Some(charset) = &self.charset_static {
            if charset.trim().is_empty() {
                return Err(AppError::configuration(
                    "charset_static must not be empty when set",
                ));
            }
        }
        for (name, value) in [
            ("media_type_default", &self.media_type_default),
            ("media_type_json", &self.media_type_json),
        ] {
            if !is_media_type(value) {
                return Err(AppError::configuration(format!(
                    "{name} is not a media type: {value}"
                )));
            }
        }
        if self.network_engine.trim().is_empty() {
            return Err(AppError::configuration("network_engine must not be empty"));
        }
        if self.renderer_default.trim().is_empty() {
            return Err(AppError::configuration("renderer_default must not be empty"));
        }
        if self
            .log_filter
            .contains(|c: char| c == ',' || c == '=' || c.is_whitespace())
        {
            return Err(AppError::configuration(format!(
                "log_filter must be a single target path: {}",
                self.log_filter
            )));
        }
        if self.indices.iter().any(|name| name.is_empty()) {
            return Err(AppError::configuration("indices must not contain empty names"));
        }
        for (name, root) in [("www_root", &self.www_root), ("project_root", &self.project_root)] {
            if let Some(root) = root {
                if !root.is_dir() {
                    return Err(AppError::configuration(format!(
                        "{name} does not point to a directory: {}",
                        root.display()
                    )));
                }
            }
        }
        Ok(())
    }

    /// The root publishing directory, falling back to the working directory.
    pub fn resolved_www_root(&self) -> AppResult<PathBuf> {
        match &self.www_root {
            Some(root) => Ok(root.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    /// Find the first index file present in `dir`.
    pub fn find_index(&self, dir: &Path) -> Option<PathBuf> {
        self.indices
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Whether the website should answer every request as unavailable.
    pub fn is_unavailable(&self) -> bool {
        self.unavailable > 0
    }

    /// Moment the website expects to be available again, counted from `now`.
    ///
    /// `None` when `unavailable` is zero.
    pub fn retry_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.is_unavailable()
            .then(|| now + Duration::minutes(i64::from(self.unavailable)))
    }

    /// Full `Content-Type` value for dynamic resources of `media_type`.
    pub fn content_type_dynamic(&self, media_type: &str) -> String {
        format!("{media_type}; charset={}", self.charset_dynamic)
    }
}

/// Format a timestamp as an HTTP-date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(moment: DateTime<Utc>) -> String {
    moment.format(HTTP_DATE_FORMAT).to_string()
}

/// Split a list of names the way the command line and environment accept
/// them: on commas when one is present, on whitespace otherwise.
pub fn split_name_list(raw: &str) -> Vec<String> {
    if raw.contains(',') {
        raw.split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        raw.split_whitespace().map(str::to_string).collect()
    }
}

fn is_media_type(value: &str) -> bool {
    match value.split_once('/') {
        Some((kind, subtype)) => !kind.trim().is_empty() && !subtype.trim().is_empty(),
        None => false,
    }
}

struct NameListVisitor;

impl<'de> Visitor<'de> for NameListVisitor {
    type Value = Vec<String>;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a comma or whitespace separated string, or a list of names")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(split_name_list(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(split_name_list(&v))
    }

    // `try_parsing` hands a lone token like `404` or `true` over as a scalar.
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(vec![v.to_string()])
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(vec![v.to_string()])
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(vec![v.to_string()])
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(vec![v.to_string()])
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut names = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(NameItem(name)) = seq.next_element()? {
            names.push(name);
        }
        Ok(names)
    }
}

/// One list element; scalars are kept in their textual form.
struct NameItem(String);

impl<'de> Deserialize<'de> for NameItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ItemVisitor;

        impl Visitor<'_> for ItemVisitor {
            type Value = String;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a name")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
                Ok(v.to_string())
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
                Ok(v.to_string())
            }
        }

        deserializer.deserialize_any(ItemVisitor).map(NameItem)
    }
}

fn deserialize_name_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(NameListVisitor)
}

fn deserialize_path_list<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_name_list(deserializer).map(|names| names.into_iter().map(PathBuf::from).collect())
}

fn default_charset_dynamic() -> String {
    "UTF-8".to_string()
}

fn default_indices() -> Vec<String> {
    vec![
        "index".to_string(),
        "index.html".to_string(),
        "index.json".to_string(),
    ]
}

fn default_media_type_default() -> String {
    "text/plain".to_string()
}

fn default_media_type_json() -> String {
    "application/json".to_string()
}

fn default_network_engine() -> String {
    "cherrypy".to_string()
}

fn default_renderer_default() -> String {
    "stdlib_percent".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let config = WebsiteConfig::default();
        assert!(!config.changes_reload);
        assert_eq!(config.charset_dynamic, "UTF-8");
        assert_eq!(config.charset_static, None);
        assert!(config.configuration_scripts.is_empty());
        assert_eq!(config.indices, vec!["index", "index.html", "index.json"]);
        assert!(!config.list_directories);
        assert_eq!(config.logging_threshold, 0);
        assert_eq!(config.media_type_default, "text/plain");
        assert_eq!(config.media_type_json, "application/json");
        assert_eq!(config.network_engine, "cherrypy");
        assert_eq!(config.network_address.to_string(), "0.0.0.0:8080");
        assert_eq!(config.project_root, None);
        assert_eq!(config.renderer_default, "stdlib_percent");
        assert!(!config.show_tracebacks);
        assert_eq!(config.www_root, None);
        assert_eq!(config.unavailable, 0);
        assert_eq!(config.mode, Mode::Development);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_vars_empty_matches_default() {
        let config = WebsiteConfig::from_vars(Vec::<(String, String)>::new()).expect("load");
        assert_eq!(config, WebsiteConfig::default());
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = WebsiteConfig::from_vars([
            ("ASPEN_CHANGES_RELOAD", "true"),
            ("ASPEN_CHARSET_STATIC", "ISO-8859-1"),
            ("ASPEN_LOGGING_THRESHOLD", "2"),
            ("ASPEN_NETWORK_ADDRESS", ":9000"),
            ("ASPEN_UNAVAILABLE", "15"),
            ("ASPEN_MODE", "prod"),
            ("ASPEN_LOG_FORMAT", "verbose"),
        ])
        .expect("load");

        assert!(config.changes_reload);
        assert_eq!(config.charset_static.as_deref(), Some("ISO-8859-1"));
        assert_eq!(config.logging_threshold, 2);
        assert_eq!(config.network_address.to_string(), "0.0.0.0:9000");
        assert_eq!(config.unavailable, 15);
        assert_eq!(config.mode, Mode::Production);
        assert_eq!(config.log_format, LogFormat::Verbose);
    }

    #[test]
    fn test_from_vars_indices_separators() {
        let commas =
            WebsiteConfig::from_vars([("ASPEN_INDICES", "index.htm, default.html")]).expect("load");
        assert_eq!(commas.indices, vec!["index.htm", "default.html"]);

        let spaces =
            WebsiteConfig::from_vars([("ASPEN_INDICES", "index.htm default.html")]).expect("load");
        assert_eq!(spaces.indices, vec!["index.htm", "default.html"]);
    }

    #[test]
    fn test_from_vars_numeric_names() {
        let config = WebsiteConfig::from_vars([("ASPEN_INDICES", "404")]).expect("load");
        assert_eq!(config.indices, vec!["404"]);

        let config =
            WebsiteConfig::from_vars([("ASPEN_CONFIGURATION_SCRIPTS", "1")]).expect("load");
        assert_eq!(config.configuration_scripts, vec![PathBuf::from("1")]);

        let config = WebsiteConfig::from_vars([("ASPEN_INDICES", "true")]).expect("load");
        assert_eq!(config.indices, vec!["true"]);
    }

    #[test]
    fn test_indices_from_json_list() {
        let config: WebsiteConfig =
            serde_json::from_str(r#"{"indices": ["index.html", 404]}"#).expect("parse");
        assert_eq!(config.indices, vec!["index.html", "404"]);
    }

    #[test]
    fn test_from_vars_does_not_validate() {
        let config = WebsiteConfig::from_vars([("ASPEN_WWW_ROOT", "/nonexistent/aspen/www")])
            .expect("load");
        assert_eq!(config.www_root, Some(PathBuf::from("/nonexistent/aspen/www")));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_log_filter() {
        let config = WebsiteConfig::from_vars([("ASPEN_LOG_FILTER", "aspen_hooks")]).expect("load");
        assert_eq!(config.log_filter, "aspen_hooks");
        assert!(config.validate().is_ok());

        let config = WebsiteConfig {
            log_filter: "aspen=debug".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_vars_rejects_bad_address() {
        let err = WebsiteConfig::from_vars([("ASPEN_NETWORK_ADDRESS", "localhost:http")])
            .expect_err("should reject");
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_validate_rejects_missing_www_root() {
        let config = WebsiteConfig {
            www_root: Some(PathBuf::from("/nonexistent/aspen/www")),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_media_type() {
        let config = WebsiteConfig {
            media_type_default: "plain".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_retry_after() {
        let now = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();

        let available = WebsiteConfig::default();
        assert_eq!(available.retry_after(now), None);

        let down = WebsiteConfig {
            unavailable: 5,
            ..Default::default()
        };
        let expected = Utc.with_ymd_and_hms(1994, 11, 6, 8, 54, 37).unwrap();
        assert_eq!(down.retry_after(now), Some(expected));
        assert_eq!(http_date(expected), "Sun, 06 Nov 1994 08:54:37 GMT");
    }

    #[test]
    fn test_find_index_respects_order() {
        let dir = std::env::temp_dir().join(format!("aspen-index-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        std::fs::write(dir.join("index.json"), "{}").expect("write");
        std::fs::write(dir.join("index.html"), "<p>").expect("write");

        let config = WebsiteConfig::default();
        assert_eq!(config.find_index(&dir), Some(dir.join("index.html")));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn test_content_type_dynamic() {
        let config = WebsiteConfig::default();
        assert_eq!(
            config.content_type_dynamic("text/html"),
            "text/html; charset=UTF-8"
        );
    }
}
