use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub supabase: Option<SupabaseSettings>,
    #[serde(default)]
    pub sms: SmsSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Candidate source; without it callers must send candidates inline
#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_listings_table")]
    pub listings_table: String,
    #[serde(default = "default_requests_table")]
    pub property_requests_table: String,
}

fn default_listings_table() -> String { "listing".to_string() }
fn default_requests_table() -> String { "property_requests".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct SmsSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_sms_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_sms_sender")]
    pub sender: String,
}

impl Default for SmsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_sms_endpoint(),
            token: String::new(),
            sender: default_sms_sender(),
        }
    }
}

fn default_sms_endpoint() -> String { "https://api.sparrowsms.com/v2/sms/".to_string() }
fn default_sms_sender() -> String { "InfoSMS".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_max_distance_km")]
    pub max_distance_km: f64,
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            max_distance_km: default_max_distance_km(),
            max_candidates: default_max_candidates(),
        }
    }
}

fn default_max_distance_km() -> f64 { crate::core::DEFAULT_MAX_DISTANCE_KM }
fn default_max_candidates() -> usize { 1000 }

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    #[serde(default = "default_dedupe_ttl_secs")]
    pub dedupe_ttl_secs: u64,
    #[serde(default = "default_dedupe_capacity")]
    pub dedupe_capacity: u64,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            dedupe_ttl_secs: default_dedupe_ttl_secs(),
            dedupe_capacity: default_dedupe_capacity(),
        }
    }
}

fn default_dedupe_ttl_secs() -> u64 { 86_400 }
fn default_dedupe_capacity() -> u64 { 100_000 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PROPMATCH)
    /// 5. Well-known credential variables (SUPABASE_URL, SUPABASE_ANON_KEY, SPARROW_SMS_TOKEN)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PROPMATCH__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        let settings = apply_credential_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    ///
    /// Same layering as [`Settings::load`], with `path` in place of the
    /// `config/` files.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        let settings = apply_credential_overrides(settings)?;

        settings.try_deserialize()
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("PROPMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Pick up credentials from the variable names the rest of the stack uses
fn apply_credential_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("SUPABASE_URL") {
        builder = builder.set_override("supabase.url", url)?;
    }
    if let Ok(key) = env::var("SUPABASE_ANON_KEY") {
        builder = builder.set_override("supabase.api_key", key)?;
    }
    if let Ok(token) = env::var("SPARROW_SMS_TOKEN") {
        builder = builder.set_override("sms.token", token)?;
    }

    builder.build()
}
