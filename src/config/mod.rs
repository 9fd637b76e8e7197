// Configuration module entry point
// Loads application configuration and turns site sections into runnable sites

mod site;
mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

// Re-export public types
pub use site::{Site, SiteKind};
pub use state::AppState;
pub use types::{
    AppInfoConfig, Config, DownloadLinks, HttpConfig, LoggingConfig, MirrorConfig,
    PerformanceConfig, PortalConfig, ServerConfig,
};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("DEPOT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.backlog", 128)?
            .set_default("portal.enabled", true)?
            .set_default("portal.bind_address", "0.0.0.0")?
            .set_default("portal.port", 12000)?
            .set_default("portal.root_dir", "web")?
            .set_default("portal.downloads_dir", "downloads")?
            .set_default("portal.downloads_url_prefix", "/downloads/")?
            .set_default("mirror.enabled", true)?
            .set_default("mirror.bind_address", "0.0.0.0")?
            .set_default("mirror.port", 12001)?
            .set_default("mirror.root_dir", ".")?
            .set_default("mirror.latest_apk", "/android/nexus-controller-hub-v2.apk")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.shutdown_timeout", 30)?
            .set_default("http.server_name", "apk-depot/0.1")?
            .build()?;

        settings.try_deserialize()
    }

    /// Build every site whose section is enabled, portal first
    pub fn enabled_sites(&self) -> Result<Vec<Site>, String> {
        let mut sites = Vec::with_capacity(2);
        if self.portal.enabled {
            sites.push(Site::portal(&self.portal)?);
        }
        if self.mirror.enabled {
            sites.push(Site::mirror(&self.mirror)?);
        }
        Ok(sites)
    }
}

/// Parse `bind_address` + `port` into a socket address (IPv4 or IPv6 literal)
pub fn parse_socket_addr(bind_address: &str, port: u16) -> Result<SocketAddr, String> {
    bind_address
        .parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, port))
        .map_err(|e| format!("Invalid bind address '{bind_address}': {e}"))
}
