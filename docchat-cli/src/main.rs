use clap::Parser;
use docchat_cli::{AppConfig, Cli, Command, build_session, console};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    docchat_telemetry::init_with_format("docchat", cli.log_format)?;

    let config = AppConfig::from_cli(&cli)?;
    let mut session = build_session(&config)?;

    match cli.command.clone().unwrap_or_default() {
        Command::Ask { doc, question } => {
            console::run_once(session, &doc, &question.join(" ")).await
        }
        Command::Chat { doc } => {
            if let Some(doc) = doc {
                let report = console::upload_file(&mut session, &doc).await?;
                println!("{report}");
            }
            console::run_console(session).await
        }
    }
}
