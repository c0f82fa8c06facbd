use anyhow::Result;

use respira::app::App;
use respira::config::{self, Config};
use respira::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure config directory exists (creates logs and profiles dirs too)
    config::ensure_directories()?;

    // Initialize file logging BEFORE any tracing calls
    let (log_file_info, _guard) = logging::init_file_logging(config::logs_dir())?;

    // Clean up old logs (7-day retention)
    if let Ok(count) = logging::cleanup_old_logs(&config::logs_dir()) {
        if count > 0 {
            tracing::info!("Cleaned up {} old log files", count);
        }
    }

    tracing::info!("Logging to: {}", log_file_info.path.display());

    let config = Config::load()?;

    // Run the application
    let mut app = App::new(config, log_file_info)?;
    app.run().await
}
