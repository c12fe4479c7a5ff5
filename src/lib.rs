// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to implement the interactive CLI.
//
// Module responsibilities:
// - `workflow`: One submit cycle end to end (validation, upload, response
//   classification, save, status reporting) over injected endpoint and sink
//   capabilities so tests can substitute doubles for both.
// - `api`: The real endpoint capability: a blocking HTTP client that POSTs
//   the multipart payload to the generation service.
// - `disposition`: `Content-Disposition` parsing to recover the archive
//   name the server suggests.
// - `download`: Saving the returned archive through a scoped temporary file.
// - `config`: Persisted settings (base URL, download directory).
// - `ui`: Terminal menu, prompts and the spinner-backed status sink.
//
// Keeping this separation makes it easier to test the workflow against
// doubles or replace the UI in the future (for example, adding a TUI).
pub mod api;
pub mod config;
pub mod disposition;
pub mod download;
pub mod ui;
pub mod workflow;
