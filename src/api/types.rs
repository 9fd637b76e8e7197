// API types module
// Response bodies of the portal's JSON endpoints

use serde::Serialize;

use crate::config::{AppInfoConfig, DownloadLinks};

/// `/api/info` document
#[derive(Debug, Serialize)]
pub struct AppInfo<'a> {
    pub app_name: &'a str,
    pub version: &'a str,
    /// Generated per request
    pub build_date: String,
    pub description: &'a str,
    pub features: &'a [String],
    pub download_links: &'a DownloadLinks,
}

impl<'a> AppInfo<'a> {
    pub fn new(app: &'a AppInfoConfig, build_date: String) -> Self {
        Self {
            app_name: &app.app_name,
            version: &app.version,
            build_date,
            description: &app.description,
            features: &app.features,
            download_links: &app.download_links,
        }
    }
}

/// One regular file in the downloads directory
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    /// RFC 3339 modification time in local time
    pub modified: String,
    pub download_url: String,
}
