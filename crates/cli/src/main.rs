use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "shelf-cli", version, about = "Operate the shelf book service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Connect to the database, apply migrations, and serve HTTP
    Serve,
    /// Apply pending schema migrations and exit
    Migrate,
    /// Print the effective configuration (credentials omitted)
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load shelf settings")?;

    match cli.command {
        Command::Serve => {
            shelf_telemetry::init(&settings.telemetry)?;
            shelf_app::serve(settings).await
        }
        Command::Migrate => {
            shelf_telemetry::init(&settings.telemetry)?;
            let applied = shelf_app::migrate(&settings).await?;
            tracing::info!(applied, "migrations complete");
            println!("applied {applied} migration(s)");
            Ok(())
        }
        Command::Config => {
            print_config(&settings);
            Ok(())
        }
    }
}

fn print_config(settings: &Settings) {
    println!("environment:        {:?}", settings.environment);
    println!(
        "server:             {}:{}",
        settings.server.host, settings.server.port
    );
    println!("base_path:          {}", settings.server.base_path);
    println!("request_timeout_ms: {}", settings.server.request_timeout_ms);
    println!("database:           {}", settings.database.display_target());
    println!("ssl_mode:           {}", settings.database.ssl_mode);
    println!("max_connections:    {}", settings.database.max_connections);
    println!("log_format:         {:?}", settings.telemetry.log_format);
}
