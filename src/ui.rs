// UI layer: provides a simple interactive menu using `dialoguer`.
// The prompts capture the form state; everything after that belongs to the
// workflow, which reports back through the terminal status sink below.

use crate::api::ApiClient;
use crate::config::Settings;
use crate::download::ArchiveWriter;
use crate::workflow::{self, FileBlob, FormState, StatusSink, STATUS_DOWNLOAD_STARTED};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

/// Main interactive menu. Receives an `ApiClient` instance and the loaded
/// settings and runs a simple select loop until the user chooses "Exit".
///
/// Note: `Select::interact()` is keyboard-driven: arrow keys and Enter pick
/// an option. The loop is strictly sequential, so a second submission can
/// never start while one is still in flight.
pub fn main_menu(mut api: ApiClient, mut settings: Settings) -> Result<()> {
    loop {
        let items = vec!["Generate project", "Configure", "Exit"];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                handle_generate(&api, &settings)?;
            }
            1 => {
                // Configuration flow persists the new values and rebuilds the
                // client so a changed base URL takes effect immediately.
                settings = handle_configure(settings)?;
                api = ApiClient::from_settings(&settings)?;
            }
            2 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Collect the form fields, read the named files into blobs and run one
/// submit cycle. Empty paths mean "nothing selected": the workflow turns
/// those into its own instructional messages, so the prompts allow them.
fn handle_generate(api: &ApiClient, settings: &Settings) -> Result<()> {
    let sql_path: String = Input::new()
        .with_prompt("SQL schema file")
        .allow_empty(true)
        .interact_text()?;
    let overrides_path: String = Input::new()
        .with_prompt("Overrides file (optional)")
        .allow_empty(true)
        .interact_text()?;
    let project_name: String = Input::new()
        .with_prompt("Project name")
        .allow_empty(true)
        .interact_text()?;

    // A path that exists but cannot be read never reaches the workflow; the
    // browser form this mirrors cannot hand over an unreadable selection.
    let form = match build_form(&sql_path, &overrides_path, project_name) {
        Ok(form) => form,
        Err(e) => {
            println!("Cannot read input file: {}", e);
            return Ok(());
        }
    };

    let sink = TerminalStatusSink::new();
    let writer = ArchiveWriter::new(settings.output_dir.clone());
    workflow::handle_submit(form, api, &sink, &writer);
    sink.finish();
    Ok(())
}

/// Prompt for the base URL and download directory, persist them and return
/// the updated settings.
fn handle_configure(settings: Settings) -> Result<Settings> {
    let base_url: String = Input::new()
        .with_prompt("Generator base URL")
        .with_initial_text(settings.base_url)
        .interact_text()?;
    let output_dir: String = Input::new()
        .with_prompt("Download directory")
        .with_initial_text(settings.output_dir.display().to_string())
        .interact_text()?;

    let updated = Settings {
        base_url,
        output_dir: PathBuf::from(output_dir),
    };
    updated.save(&Settings::default_path())?;
    println!("Settings saved.");
    Ok(updated)
}

fn build_form(sql_path: &str, overrides_path: &str, project_name: String) -> Result<FormState> {
    Ok(FormState {
        sql_file: read_blob(sql_path)?,
        overrides_file: read_blob(overrides_path)?,
        project_name,
    })
}

/// Read a file into a named blob; an empty path means no file was chosen.
fn read_blob(path: &str) -> Result<Option<FileBlob>> {
    let path = path.trim();
    if path.is_empty() {
        return Ok(None);
    }
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path))?;
    let name = Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("upload.bin")
        .to_string();
    Ok(Some(FileBlob { name, bytes }))
}

/// Terminal status sink: one spinner line, overwritten on every transition,
/// mirroring the single status region of the upload page. Remembers the last
/// message so [`finish`](TerminalStatusSink::finish) can restate it once the
/// spinner is gone.
pub struct TerminalStatusSink {
    spinner: ProgressBar,
    last: Mutex<String>,
}

impl TerminalStatusSink {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
        spinner.enable_steady_tick(Duration::from_millis(120));
        TerminalStatusSink {
            spinner,
            last: Mutex::new(String::new()),
        }
    }

    /// Stop the spinner and print the terminal status on its own line: green
    /// for a started download, red for everything else.
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
        let last = self.last.lock().unwrap();
        if last.as_str() == STATUS_DOWNLOAD_STARTED {
            println!("{}", last.as_str().green());
        } else {
            println!("{}", last.as_str().red());
        }
    }
}

impl Default for TerminalStatusSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSink for TerminalStatusSink {
    fn set_status(&self, text: &str) {
        self.spinner.set_message(text.to_string());
        *self.last.lock().unwrap() = text.to_string();
    }
}
