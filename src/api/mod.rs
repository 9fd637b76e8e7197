// API module entry
// Read-only JSON endpoints of the portal site

mod listing;
mod response;
mod types;

use chrono::Local;
use hyper::{Response, StatusCode};
use std::path::Path;

use crate::config::AppInfoConfig;
use crate::http::ResponseBody;
use crate::logger;

// Re-export public types
pub use listing::list_files;
pub use response::{error_response, json_response};
pub use types::{AppInfo, FileEntry};

/// `GET /api/info`
pub fn handle_info(app: &AppInfoConfig) -> Response<ResponseBody> {
    let info = AppInfo::new(app, Local::now().to_rfc3339());
    json_response(StatusCode::OK, &info)
}

/// `GET /api/files`
pub async fn handle_files(dir: &Path, url_prefix: &str) -> Response<ResponseBody> {
    match list_files(dir, url_prefix).await {
        Ok(files) => json_response(StatusCode::OK, &files),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list downloads directory '{}': {e}",
                dir.display()
            ));
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_info_document_shape() {
        let resp = handle_info(&AppInfoConfig::default());
        assert_eq!(resp.status(), 200);
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["app_name"], "Nexus Controller Hub");
        assert_eq!(json["version"], "1.0.0");
        assert_eq!(json["features"].as_array().unwrap().len(), 5);
        assert_eq!(
            json["download_links"]["latest_apk"],
            "/downloads/nexus-controller-hub-latest.apk"
        );
        let build_date = json["build_date"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(build_date).is_ok());
    }

    #[tokio::test]
    async fn test_empty_listing_is_literal_brackets() {
        let dir = tempfile::tempdir().unwrap();
        let resp = handle_files(dir.path(), "/downloads/").await;
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"[]");
    }
}
