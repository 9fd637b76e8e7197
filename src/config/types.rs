// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub portal: PortalConfig,
    pub mirror: MirrorConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub app: AppInfoConfig,
}

/// Process-wide server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub workers: Option<usize>,
    /// Listen backlog passed to `listen(2)`
    pub backlog: i32,
}

/// Portal site: generated web root plus the JSON API
#[derive(Debug, Deserialize, Clone)]
pub struct PortalConfig {
    pub enabled: bool,
    pub bind_address: String,
    pub port: u16,
    pub root_dir: String,
    /// Directory scanned by `/api/files`, relative to `root_dir` unless absolute
    pub downloads_dir: String,
    /// URL prefix prepended to file names in `download_url`
    pub downloads_url_prefix: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

/// Mirror site: whole project tree, landing page and latest-APK redirect
#[derive(Debug, Deserialize, Clone)]
pub struct MirrorConfig {
    pub enabled: bool,
    pub bind_address: String,
    pub port: u16,
    pub root_dir: String,
    /// `Location` of the `/download/latest` redirect
    pub latest_apk: String,
    #[serde(default = "default_index_files")]
    pub index_files: Vec<String>,
}

fn default_index_files() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
    /// Seconds in-flight connections get to finish after a shutdown signal
    pub shutdown_timeout: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
}

/// Application metadata published by `/api/info`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AppInfoConfig {
    pub app_name: String,
    pub version: String,
    pub description: String,
    pub features: Vec<String>,
    pub download_links: DownloadLinks,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DownloadLinks {
    pub latest_apk: String,
    pub debug_apk: String,
    pub source_code: String,
}

impl Default for AppInfoConfig {
    fn default() -> Self {
        Self {
            app_name: "Nexus Controller Hub".to_string(),
            version: "1.0.0".to_string(),
            description: "High-performance Android controller remapping and macro app"
                .to_string(),
            features: vec![
                "Real-time controller input visualization".to_string(),
                "Button remapping with live feedback".to_string(),
                "Macro recording and playback".to_string(),
                "Multi-controller support".to_string(),
                "Offline-first design".to_string(),
            ],
            download_links: DownloadLinks::default(),
        }
    }
}

impl Default for DownloadLinks {
    fn default() -> Self {
        Self {
            latest_apk: "/downloads/nexus-controller-hub-latest.apk".to_string(),
            debug_apk: "/downloads/nexus-controller-hub-debug.apk".to_string(),
            source_code: "/downloads/nexus-controller-hub-source.zip".to_string(),
        }
    }
}
