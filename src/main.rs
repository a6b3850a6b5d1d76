//! Binary entry point: resolve the data directory, start file logging, load
//! the mail settings, and hand control to the terminal UI. None of the setup
//! steps is fatal; without them the form still opens in preview mode.
use club_info_collector::{data_dir, init_logger_or_warn, run_app, App, MailConfig};
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    let data_dir = data_dir();
    let _guard = data_dir
        .as_ref()
        .ok()
        .and_then(|dir| init_logger_or_warn(&dir.join("logs")));
    if let Err(err) = &data_dir {
        eprintln!("warning: {err}; settings file and logs are disabled");
        warn!(error = %err, "no data directory");
    }

    let config = MailConfig::load(data_dir.as_deref().ok());
    info!(
        credentials = config.credentials().is_some(),
        recipient = %config.recipient,
        "starting club info collector"
    );

    let mut app = App::new(config, chrono::Local::now().date_naive());
    let result = run_app(&mut app);
    if let Err(err) = &result {
        tracing::error!(error = %err, "terminal session ended with an error");
    }
    result
}
