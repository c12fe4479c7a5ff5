// Submit-cycle orchestration: one function drives validation, upload,
// response classification, filename recovery and the final save, reporting
// every transition through a status sink. The endpoint and the sink are
// injected capabilities so tests can substitute doubles for both.

use anyhow::Result;
use log::{debug, error};
use thiserror::Error;

use crate::disposition::filename_from_disposition;
use crate::download::ArchiveWriter;

/// Status line shown while form state is captured and validated.
pub const STATUS_PREPARING: &str = "Preparing...";
/// Status line shown while the multipart request is in flight.
pub const STATUS_UPLOADING: &str = "Uploading...";
/// Status line shown while the archive body is being read.
pub const STATUS_GENERATING: &str = "Generating ZIP...";
/// Terminal status of a successful cycle.
pub const STATUS_DOWNLOAD_STARTED: &str = "Download started";

/// An in-memory binary payload together with the name it was selected under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBlob {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Raw form reads, captured once at the start of a submit cycle. Both file
/// slots may be empty; validation happens when this is turned into a
/// [`SubmissionInput`].
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub sql_file: Option<FileBlob>,
    pub overrides_file: Option<FileBlob>,
    pub project_name: String,
}

/// Validated submission: the SQL file is present and the project name is
/// trimmed and non-empty. Built fresh per cycle and dropped once the request
/// has been sent.
#[derive(Debug, Clone)]
pub struct SubmissionInput {
    pub sql_file: FileBlob,
    pub overrides_file: Option<FileBlob>,
    pub project_name: String,
}

/// Local validation failures. The display text doubles as the status
/// message, so the user sees exactly the instructional wording below and no
/// request is ever sent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a SQL file.")]
    MissingSqlFile,
    #[error("Please enter a project name.")]
    MissingProjectName,
}

impl SubmissionInput {
    /// Validate raw form state. The SQL-file check runs before the
    /// project-name check; only the first failure is reported.
    pub fn from_form(form: FormState) -> Result<Self, ValidationError> {
        let sql_file = form.sql_file.ok_or(ValidationError::MissingSqlFile)?;
        let project_name = form.project_name.trim().to_string();
        if project_name.is_empty() {
            return Err(ValidationError::MissingProjectName);
        }
        Ok(Self {
            sql_file,
            overrides_file: form.overrides_file,
            project_name,
        })
    }
}

/// The visible surface the user reads. One short message at a time,
/// overwritten on every transition; implementations must not queue or batch.
pub trait StatusSink {
    fn set_status(&self, text: &str);
}

/// One submitted generation request: status line details are available up
/// front, the body is read on demand. Keeping the body behind a consuming
/// reader gives the exchange its two distinct wait points (response headers
/// first, then the body).
pub trait EndpointReply {
    fn status(&self) -> u16;
    /// Reason phrase for the status code (for example "Internal Server
    /// Error"); empty when the code has none.
    fn status_text(&self) -> String;
    /// `Content-Disposition` header value, if present. Implementations must
    /// treat the header name case-insensitively.
    fn content_disposition(&self) -> Option<String>;
    /// Read the body as text, consuming the reply.
    fn read_text(self) -> Result<String>;
    /// Read the body as raw bytes, consuming the reply.
    fn read_bytes(self) -> Result<Vec<u8>>;
}

/// The generation service, reduced to the one call this workflow makes.
pub trait GenerateEndpoint {
    type Reply: EndpointReply;

    /// POST the multipart payload and return once response headers are
    /// available.
    fn submit(&self, input: &SubmissionInput) -> Result<Self::Reply>;
}

/// The HTTP status alone decides the branch; a non-2xx reply is a server
/// failure even when a body is present.
fn is_success(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Drive one submit cycle end to end. Every transition is reported through
/// `sink`; on success the archive lands in `saver`'s directory. The function
/// itself never fails: all outcomes, including caught errors, resolve to a
/// terminal status message.
pub fn handle_submit<E, S>(form: FormState, endpoint: &E, sink: &S, saver: &ArchiveWriter)
where
    E: GenerateEndpoint,
    S: StatusSink,
{
    sink.set_status(STATUS_PREPARING);

    let input = match SubmissionInput::from_form(form) {
        Ok(input) => input,
        Err(err) => {
            sink.set_status(&err.to_string());
            return;
        }
    };

    if let Err(err) = run_cycle(&input, endpoint, sink, saver) {
        error!("generation cycle failed: {err:#}");
        sink.set_status(&format!("Error: {err}"));
    }
}

/// Everything past validation. A server-reported failure is a classified
/// branch that terminates with its own status (`Ok` here); an `Err` is an
/// unexpected transport, decoding or write failure for the caller's
/// catch-all.
fn run_cycle<E, S>(
    input: &SubmissionInput,
    endpoint: &E,
    sink: &S,
    saver: &ArchiveWriter,
) -> Result<()>
where
    E: GenerateEndpoint,
    S: StatusSink,
{
    sink.set_status(STATUS_UPLOADING);
    debug!(
        "submitting {} for project {:?}",
        input.sql_file.name, input.project_name
    );
    let reply = endpoint.submit(input)?;

    let status = reply.status();
    if !is_success(status) {
        let reason = reply.status_text();
        // Best effort: a body that cannot be read counts as absent.
        let body = reply.read_text().unwrap_or_default();
        let detail = if body.is_empty() { reason } else { body };
        sink.set_status(&format!("Server error: {status} - {detail}"));
        return Ok(());
    }

    sink.set_status(STATUS_GENERATING);
    let disposition = reply.content_disposition();
    let bytes = reply.read_bytes()?;

    let filename = filename_from_disposition(disposition.as_deref());
    let path = saver.write(&filename, &bytes)?;
    debug!("archive saved to {}", path.display());

    sink.set_status(STATUS_DOWNLOAD_STARTED);
    Ok(())
}
