// Entrypoint for the CLI application.
// - Keeps `main` small: load settings, create an API client and hand both
//   to the UI loop.
// - Returns `anyhow::Result` so setup failures print with context.

use autocrud_cli::{api::ApiClient, config::Settings, ui::main_menu};

fn main() -> anyhow::Result<()> {
    // Diagnostics go through the `log` facade; set RUST_LOG to see them.
    env_logger::init();

    // Settings come from ~/.autocrud-cli.json when present, with the
    // `AUTOCRUD_URL` variable overriding the base URL. See `config`.
    let settings = Settings::load(&Settings::default_path())?;
    let api = ApiClient::from_settings(&settings)?;

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(api, settings)?;
    Ok(())
}
