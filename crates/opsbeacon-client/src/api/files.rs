//! Files API.

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};

use crate::client::OpsBeaconClient;
use crate::error::{Error, Result};
use crate::types::{FileUrlResponse, UploadSource};

/// Files API client.
pub struct FilesApi {
    client: OpsBeaconClient,
}

impl FilesApi {
    pub(crate) fn new(client: OpsBeaconClient) -> Self {
        Self { client }
    }

    /// Upload a file to the workspace and return the raw response text.
    ///
    /// For [`UploadSource::Path`], the file's existence is checked before
    /// any network call.
    pub async fn upload(&self, source: UploadSource) -> Result<String> {
        let (name, content, mime) = match source {
            UploadSource::Content { name, content } => {
                if name.is_empty() {
                    return Err(Error::validation_field(
                        "file name is required when uploading content",
                        "name",
                    ));
                }
                (name, content, "text/csv")
            }
            UploadSource::Path { path, name } => {
                if !path.exists() {
                    return Err(Error::FileOperation {
                        file: Some(path.display().to_string()),
                        operation: "upload",
                        message: format!("File not found: {}", path.display()),
                        source: None,
                    });
                }
                let name = name.unwrap_or_else(|| basename(&path));
                let content = tokio::fs::read(&path).await.map_err(|e| Error::FileOperation {
                    file: Some(path.display().to_string()),
                    operation: "upload",
                    message: format!("failed to read {}: {e}", path.display()),
                    source: None,
                })?;
                (name, content, "application/octet-stream")
            }
        };

        let part = Part::bytes(content)
            .file_name(name.clone())
            .mime_str(mime)
            .map_err(|e| Error::validation(format!("invalid MIME type: {e}")))?;
        let form = Form::new().text("filename", name.clone()).part("file", part);

        tracing::debug!(file = %name, "uploading file");

        self.client
            .post_multipart("/workspace/v2/files", form)
            .await
            .map_err(|e| Error::FileOperation {
                file: Some(name),
                operation: "upload",
                message: format!("Failed to upload file: {e}"),
                source: Some(Box::new(e)),
            })
    }

    /// Get a short-lived signed download URL for a file.
    ///
    /// The URL is transient and not cached; fetch a fresh one per download.
    pub async fn download_url(&self, file_id: &str) -> Result<String> {
        if file_id.is_empty() {
            return Err(Error::validation_field("file_id is required", "file_id"));
        }

        let response: FileUrlResponse = self
            .client
            .get(&format!("/workspace/v2/file-url/{file_id}"))
            .await?;

        if !response.success {
            return Err(Error::FileOperation {
                file: Some(file_id.to_string()),
                operation: "get_download_url",
                message: response.err.unwrap_or_else(|| "Unknown error".to_string()),
                source: None,
            });
        }

        response.url.ok_or_else(|| Error::FileOperation {
            file: Some(file_id.to_string()),
            operation: "get_download_url",
            message: "response carried no url".to_string(),
            source: None,
        })
    }

    /// Download a file to a local path.
    ///
    /// Fetches a signed URL via [`FilesApi::download_url`], then performs a
    /// direct unauthenticated fetch of that URL. The destination defaults
    /// to the file name in the current directory.
    pub async fn download(&self, file_name: &str, destination: Option<&Path>) -> Result<()> {
        if file_name.is_empty() {
            return Err(Error::validation_field("file_name is required", "file_name"));
        }

        let url = self.download_url(file_name).await?;
        let dest: PathBuf = destination
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(file_name));

        self.fetch_to(&url, &dest)
            .await
            .map_err(|message| Error::FileOperation {
                file: Some(file_name.to_string()),
                operation: "download",
                message,
                source: None,
            })
    }

    /// Fetch a signed URL (no Authorization header) and write it locally.
    async fn fetch_to(&self, url: &str, dest: &Path) -> std::result::Result<(), String> {
        let response = reqwest::Client::new()
            .get(url)
            .timeout(self.client.timeout())
            .send()
            .await
            .map_err(|e| format!("Failed to download file: {e}"))?;

        if !response.status().is_success() {
            return Err(format!(
                "Failed to download file: HTTP {}",
                response.status().as_u16()
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to download file: {e}"))?;

        tokio::fs::write(dest, &bytes)
            .await
            .map_err(|e| format!("failed to write {}: {e}", dest.display()))
    }
}

/// The file's own name, for path uploads without an explicit override.
fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
