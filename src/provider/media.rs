//! Media upload against the provider's per-endpoint media path.
//!
//! Uploads a binary file as `multipart/form-data` and returns the
//! provider-assigned media id, which template and bot sends reference
//! in place of the raw bytes. The multipart body is assembled here
//! because the HTTP abstraction carries raw bytes.

use thiserror::Error;
use url::Url;

use super::{HttpClient, HttpError, HttpRequest};

/// Graph API version used by the media upload endpoint.
pub const MEDIA_API_VERSION: &str = "v17.0";

/// Multipart boundary. Long and unusual enough not to collide with
/// real file content.
const BOUNDARY: &str = "----bulk-relay-7f92c1d4a8e35b60";

/// Error type for media uploads.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The provider rejected the upload.
    #[error("Media upload rejected: {status} - {body}")]
    Rejected {
        /// HTTP status of the rejection.
        status: http::StatusCode,
        /// Response body text.
        body: String,
    },

    /// The provider accepted the upload but returned no media id.
    #[error("Media upload response carried no id")]
    MissingId,

    /// Transport-level failure.
    #[error(transparent)]
    Http(#[from] HttpError),
}

/// One file to upload.
#[derive(Debug, Clone)]
pub struct MediaFile {
    /// Filename reported in the multipart part.
    pub file_name: String,
    /// MIME type of the file.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Uploads media files and returns their provider ids.
#[derive(Debug, Clone)]
pub struct MediaUploader<C> {
    client: C,
    base: Url,
}

impl<C> MediaUploader<C> {
    /// Creates an uploader targeting the given Graph API base URL.
    #[must_use]
    pub const fn new(client: C, base: Url) -> Self {
        Self { client, base }
    }

    fn multipart_body(file: &MediaFile) -> Vec<u8> {
        let mut body = Vec::with_capacity(file.bytes.len() + 512);
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"messaging_product\"\r\n\r\n\
                 whatsapp\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                 Content-Type: {}\r\n\r\n",
                file.file_name, file.content_type,
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }
}

impl<C: HttpClient> MediaUploader<C> {
    /// Uploads one file and returns the provider-assigned media id.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Rejected`] for non-200 responses,
    /// [`MediaError::MissingId`] if the success response carries no id,
    /// and [`MediaError::Http`] for transport faults.
    pub async fn upload(
        &self,
        token: &str,
        phone_number_id: &str,
        file: &MediaFile,
    ) -> Result<String, MediaError> {
        let url = Url::parse(&format!(
            "{}/{}/{}/media",
            self.base.as_str().trim_end_matches('/'),
            MEDIA_API_VERSION,
            phone_number_id,
        ))
        .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let content_type = http::HeaderValue::from_str(&format!(
            "multipart/form-data; boundary={BOUNDARY}"
        ))
        .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let request = HttpRequest::post(url)
            .with_bearer(token)
            .with_header(http::header::CONTENT_TYPE, content_type)
            .with_body(Self::multipart_body(file));

        let response = self.client.request(request).await?;

        if response.status != http::StatusCode::OK {
            let body = response.body_text();
            tracing::error!("Error: {} - {body}", response.status);
            return Err(MediaError::Rejected {
                status: response.status,
                body,
            });
        }

        let media_id = response
            .body_json()
            .and_then(|json| {
                json.get("id")
                    .and_then(serde_json::Value::as_str)
                    .map(ToString::to_string)
            })
            .ok_or(MediaError::MissingId)?;

        tracing::info!("Media ID: {media_id}");
        Ok(media_id)
    }
}
