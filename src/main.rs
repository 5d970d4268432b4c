//! show-table - serve one SQL report from a CMS database as an HTML table.

use show_table::cli::Cli;
use show_table::config::{resolve_connection, Config};
use show_table::db::{self, DatabaseClient};
use show_table::error::Result;
use show_table::logging::{init_file_logging, init_stderr_logging};
use show_table::server;
use show_table::service::ReportService;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    let config = match Config::load_from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    };

    let debug = cli.debug || config.report.debug;
    match &cli.log_file {
        Some(path) => init_file_logging(path, debug),
        None => init_stderr_logging(debug),
    }
    info!("Loaded config from: {}", config_path.display());

    if let Err(e) = run(cli, config).await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: Config) -> Result<()> {
    config.report.debug |= cli.debug;

    let from_cli = cli.to_connection_config()?;
    let connection = resolve_connection(from_cli.as_ref(), &config, cli.root.as_deref())?;
    info!("Connection: {}", connection.display_string());

    let timeout = Duration::from_secs(config.report.query_timeout_secs);
    let db: Arc<dyn DatabaseClient> = Arc::from(db::connect(&connection, timeout).await?);

    let service = match ReportService::from_config(&config.report, &connection, db.clone()) {
        Ok(service) => service,
        Err(e) => {
            db.close().await?;
            return Err(e);
        }
    };

    let result = match cli.print_format() {
        Some(format) => service.render(format).await.map(|body| println!("{body}")),
        None => {
            let bind = cli.bind.as_deref().unwrap_or(&config.server.bind);
            let app = server::router(Arc::new(service), &config.server.path);
            server::bind_and_serve(bind, app).await
        }
    };

    db.close().await?;
    result
}
