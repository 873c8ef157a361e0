mod cli;
mod config;
mod console;
mod forms;
mod menu;
mod table;

use anyhow::Context;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let args = match cli::parse_args(&args)? {
        cli::Command::Help => {
            cli::print_help();
            return Ok(());
        }
        cli::Command::Run(args) => args,
    };

    dotenvy::dotenv().ok();
    init_tracing();

    let project = config::ProjectConfig::load(args.config)?;
    let mut options = project.file.db.connect_options();
    if let Some(url) = args.database {
        options.url = url;
    }
    tracing::debug!(config = %project.path().display(), "loaded config");

    let client = roster::connect(&options)
        .await
        .context("failed to connect to database")?;
    println!("{}", "Database connected successfully!".green());

    if project.file.db.ensure_schema {
        roster::repo::create_table(&client)
            .await
            .context("failed to create students table")?;
    }

    let stdin = std::io::stdin();
    let mut console = console::Console::new(stdin.lock(), std::io::stdout(), std::io::stderr());
    menu::serve(client, &mut console).await?;
    Ok(())
}

/// Logs go to stderr so they never interleave with the menu on stdout.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
