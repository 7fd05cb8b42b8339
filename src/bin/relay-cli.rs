use anyhow::anyhow;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::Level;
use tradesai_relay::common::init;
use tradesai_relay::entities::messages::Message;
use tradesai_relay::models::messages::{NewMessage, NewMessageArgs};
use tradesai_relay::settings::AppSettings;
use tradesai_relay::usecases::messages::{self, RECENT_MESSAGES_LIMIT};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Read and write relay messages straight against Supabase", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the most recent messages, newest first
    List {
        #[arg(short, long, default_value_t = RECENT_MESSAGES_LIMIT)]
        limit: usize,
        /// Print the rows as returned by Supabase
        #[arg(long)]
        json: bool,
    },
    /// Store a message
    Add {
        #[arg(long)]
        from: String,
        #[arg(long)]
        text: String,
        /// Print the stored row as returned by Supabase
        #[arg(long)]
        echo: bool,
    },
    /// Store the fixed test message
    AddTest,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = AppSettings::load_from_env()?;
    init::initialize_logging(Level::WARN);
    let ctx = init::initialize_state(&settings)?;

    match cli.command {
        Commands::List { limit, json } => {
            let recent = messages::fetch_recent(&ctx, limit)
                .await
                .map_err(|e| anyhow!("{e}"))?;
            if json {
                print_json(&recent)?;
            } else {
                for message in &recent {
                    print_line(message);
                }
            }
        }
        Commands::Add { from, text, echo } => {
            let args = NewMessageArgs {
                from: Some(from),
                text: Some(text),
            };
            let message = NewMessage::try_from(args).map_err(|e| anyhow!("{e}"))?;
            if echo {
                let saved = messages::save(&ctx, &message)
                    .await
                    .map_err(|e| anyhow!("{e}"))?;
                print_json(&saved)?;
            } else {
                messages::save_quietly(&ctx, &message)
                    .await
                    .map_err(|e| anyhow!("{e}"))?;
                println!("Saved message from {}", message.from);
            }
        }
        Commands::AddTest => {
            let saved = messages::save_test_message(&ctx)
                .await
                .map_err(|e| anyhow!("{e}"))?;
            print_json(&saved)?;
        }
    }

    Ok(())
}

fn print_line(message: &Message) {
    let created_at = match message.created_at() {
        Some(created_at) => created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_owned(),
    };
    println!(
        "{created_at}  {}: {}",
        message.from().unwrap_or("<unknown>"),
        message.text().unwrap_or("")
    );
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
