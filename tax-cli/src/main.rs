use clap::Parser;
use tracing::warn;

use tax_cli::app;
use tax_cli::cli::Cli;
use tax_cli::config::AppConfig;
use tax_cli::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging("info");

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    // RUST_LOG wins over the config file, an explicit flag wins over both.
    if cli.log_level.is_some() || std::env::var_os("RUST_LOG").is_none() {
        logging::set_log_level(&config.logging.level)?;
    }
    if let Some(path) = &config.logging.file {
        if let Err(error) = logging::enable_file_logging(path) {
            warn!(%error, "file logging disabled");
        }
    }

    let mut stdout = std::io::stdout().lock();
    app::execute(&cli.command, &config, &mut stdout).await
}
