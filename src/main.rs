//! mqli - An interactive shell for Monitoring Query Language.

use std::io::IsTerminal;

use mqli::auth::TokenSource;
use mqli::cli::Cli;
use mqli::client::{MockQueryClient, MonitoringClient, QueryClient};
use mqli::config::Config;
use mqli::editor::LineEditor;
use mqli::error::Result;
use mqli::logging;
use mqli::render::RenderOptions;
use mqli::shell::{Shell, ShellOptions};
use tokio::io::BufReader;
use tracing::{error, info};

const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if cli.log_file {
        logging::init_file_logging(&logging::get_log_path());
    } else {
        logging::init_stderr_logging();
    }

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("ERROR: {}", e);
            EXIT_ERROR
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    // Precedence: CLI flags, then config file, then environment.
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config);
    config.apply_env_defaults();

    let client: Box<dyn QueryClient> = if cli.mock {
        info!("Using mock query client");
        Box::new(MockQueryClient::new())
    } else {
        let token = TokenSource::from_config(&config).fetch().await?;
        let client = MonitoringClient::new(&config, token)?;
        info!("Querying {}", client.url());
        Box::new(client)
    };

    let options = ShellOptions {
        render: RenderOptions {
            format: config.display.format,
            max_column_width: config.display.max_column_width,
        },
        spinner: config.display.spinner && std::io::stderr().is_terminal(),
        max_pages: config.max_pages,
    };
    let mut shell = Shell::new(client.as_ref(), std::io::stdout(), options);

    if let Some(query) = &cli.execute {
        let ok = shell.execute(query).await?;
        return Ok(if ok { EXIT_SUCCESS } else { EXIT_ERROR });
    }

    if std::io::stdin().is_terminal() {
        let mut editor = LineEditor::start(cli.history_path()).await?;
        shell.run_with(&mut editor).await?;
    } else {
        shell.run(BufReader::new(tokio::io::stdin())).await?;
    }
    Ok(EXIT_SUCCESS)
}
