// API client module: a small blocking HTTP client that talks to the AutoCRUD
// generation service. One endpoint matters here: the multipart upload that
// answers with a ZIP archive.

use anyhow::{Context, Result};
use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::CONTENT_DISPOSITION;

use crate::config::Settings;
use crate::workflow::{EndpointReply, FileBlob, GenerateEndpoint, SubmissionInput};

/// Multipart field names, fixed by the generation endpoint's contract.
pub const FIELD_SQL: &str = "sql";
pub const FIELD_OVERRIDES: &str = "overrides";
pub const FIELD_PROJECT_NAME: &str = "project-name";

/// Upload path on the generation service.
pub const UPLOAD_PATH: &str = "/api/generate/upload";

/// Blocking client for the generation service: a reqwest client plus the
/// base URL it posts to. The client's default 30-second timeout is disabled
/// because generation can legitimately take a long time and the workflow
/// waits it out.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL. Trailing slashes are trimmed
    /// so a hand-typed `http://host:8080/` does not double up with the
    /// leading slash of the upload path.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(None)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Client configured from persisted settings. See `config::Settings` for
    /// where the base URL comes from.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.base_url.clone())
    }
}

/// Build a multipart file part from an in-memory blob. The blob keeps the
/// name it was selected under; the content type is left generic.
fn file_part(blob: &FileBlob) -> Result<multipart::Part> {
    multipart::Part::bytes(blob.bytes.clone())
        .file_name(blob.name.clone())
        .mime_str("application/octet-stream")
        .context("Failed to build multipart file part")
}

impl GenerateEndpoint for ApiClient {
    type Reply = HttpReply;

    fn submit(&self, input: &SubmissionInput) -> Result<HttpReply> {
        let url = format!("{}{}", self.base_url, UPLOAD_PATH);

        // Field order mirrors the upload form: sql, overrides (only if one
        // was chosen), project-name.
        let mut form = multipart::Form::new().part(FIELD_SQL, file_part(&input.sql_file)?);
        if let Some(overrides) = &input.overrides_file {
            form = form.part(FIELD_OVERRIDES, file_part(overrides)?);
        }
        form = form.text(FIELD_PROJECT_NAME, input.project_name.clone());

        let res = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .context("Failed to send upload request")?;
        Ok(HttpReply { inner: res })
    }
}

/// Reply wrapper handing the workflow exactly what it consumes: the status
/// line details, the `Content-Disposition` value and one-shot body readers.
pub struct HttpReply {
    inner: Response,
}

impl EndpointReply for HttpReply {
    fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    fn status_text(&self) -> String {
        self.inner
            .status()
            .canonical_reason()
            .unwrap_or("")
            .to_string()
    }

    fn content_disposition(&self) -> Option<String> {
        // HeaderMap lookups are case-insensitive, so one get covers every
        // spelling of the header name.
        self.inner
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string())
    }

    fn read_text(self) -> Result<String> {
        self.inner.text().context("Failed to read response body")
    }

    fn read_bytes(self) -> Result<Vec<u8>> {
        let bytes = self
            .inner
            .bytes()
            .context("Failed to read archive body")?;
        Ok(bytes.to_vec())
    }
}
