mod cmd_catalog;
mod cmd_config;
mod cmd_edit;
mod cmd_init;
mod cmd_quote;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cmd_catalog::CatalogCmd;
use cmd_config::ConfigCmd;
use cmd_edit::{AddOnCmd, ClientCmd, EventCmd, FinanceCmd, MilestoneCmd};

#[derive(Parser)]
#[command(name = "quote", version, about = "Quotation builder for photography studios")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a new .quote/ workspace with the sample quotation
    Init,
    /// Create a new quotation from the studio template
    New {
        /// Fill client details from a catalog client (e.g. c1)
        #[arg(long)]
        client: Option<String>,
        /// Start from an empty quotation instead of the template
        #[arg(long)]
        blank: bool,
    },
    /// List quotations, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a quotation with its totals
    Show {
        /// Record id or quotation number
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render the printable proposal (Markdown)
    Render {
        id: String,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the history log of a quotation
    History { id: String },
    /// Delete a quotation
    Delete { id: String },
    /// Export a quotation's data as JSON
    Export {
        id: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import quotation data from a JSON file as a new record
    Import { file: PathBuf },
    /// Edit client details
    Client {
        id: String,
        #[command(subcommand)]
        cmd: ClientCmd,
    },
    /// Edit events
    Event {
        id: String,
        #[command(subcommand)]
        cmd: EventCmd,
    },
    /// Edit add-ons
    Addon {
        id: String,
        #[command(subcommand)]
        cmd: AddOnCmd,
    },
    /// Edit package, discount, tax, and advance
    Finance {
        id: String,
        #[command(subcommand)]
        cmd: FinanceCmd,
    },
    /// Edit payment milestones
    Milestone {
        id: String,
        #[command(subcommand)]
        cmd: MilestoneCmd,
    },
    /// Set a terms/deliverables field (deliverables, delivery_timeline,
    /// bank_details, payment_terms, terms, client_sign_name, studio_sign_name)
    Meta {
        id: String,
        field: String,
        value: String,
    },
    /// Manage workspace config
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
    /// Inspect and extend the studio catalog
    Catalog {
        #[command(subcommand)]
        cmd: CatalogCmd,
    },
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("QUOTE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let repo_root = std::env::current_dir()?;

    match cli.cmd {
        Command::Init => cmd_init::execute(&repo_root),
        Command::New { client, blank } => cmd_quote::new(&repo_root, client.as_deref(), blank),
        Command::List { json } => cmd_quote::list(&repo_root, json),
        Command::Show { id, json } => cmd_quote::show(&repo_root, &id, json),
        Command::Render { id, output } => cmd_quote::render(&repo_root, &id, output.as_deref()),
        Command::History { id } => cmd_quote::history(&repo_root, &id),
        Command::Delete { id } => cmd_quote::delete(&repo_root, &id),
        Command::Export { id, output } => cmd_quote::export(&repo_root, &id, output.as_deref()),
        Command::Import { file } => cmd_quote::import(&repo_root, &file),
        Command::Client { id, cmd } => cmd_edit::client(&repo_root, &id, cmd),
        Command::Event { id, cmd } => cmd_edit::event(&repo_root, &id, cmd),
        Command::Addon { id, cmd } => cmd_edit::add_on(&repo_root, &id, cmd),
        Command::Finance { id, cmd } => cmd_edit::finance(&repo_root, &id, cmd),
        Command::Milestone { id, cmd } => cmd_edit::milestone(&repo_root, &id, cmd),
        Command::Meta { id, field, value } => cmd_edit::meta(&repo_root, &id, &field, &value),
        Command::Config { cmd } => cmd_config::run(cmd, &repo_root),
        Command::Catalog { cmd } => cmd_catalog::run(cmd, &repo_root),
    }
}
