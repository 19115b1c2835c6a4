//! `fieldvisit`: command-line front end for field visit reports.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every command loads the saved session, applies the `--server` override,
//! and builds one `ApiClient` from that explicit context. Results go to
//! stdout as pretty JSON; logs go to stderr so output stays pipeable.

mod admin;
mod draft;

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use api::{ApiClient, ApiError, ClientConfig, SessionContext, SessionError, SessionStore};
use clap::{Args, Parser, Subcommand};
use forms::assemble_visit;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::draft::{DraftError, DraftFile};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("invalid draft: {0}")]
    Draft(#[from] DraftError),
    #[error("i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("missing password; pass --password or set FIELDVISIT_PASSWORD")]
    MissingPassword,
    #[error("password prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("no user with id {0}")]
    UnknownUser(i64),
    #[error("a merchandiser account needs both --zone and --manager-id")]
    IncompleteMerchandiser,
}

#[derive(Parser, Debug)]
#[command(name = "fieldvisit", about = "Field merchandising visit reports")]
struct Cli {
    #[arg(long, global = true, env = "FIELDVISIT_SERVER", help = "Server address for this run")]
    server: Option<String>,

    #[arg(long, global = true, env = "FIELDVISIT_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Settings(SettingsCommand),
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FIELDVISIT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    Logout,
    Whoami,
    Clients,
    Products,
    Competitors,
    Visit(VisitCommand),
    Review(ReviewCommand),
    Admin(admin::AdminCommand),
}

#[derive(Args, Debug)]
struct SettingsCommand {
    #[command(subcommand)]
    command: SettingsSubcommand,
}

#[derive(Subcommand, Debug)]
enum SettingsSubcommand {
    SetServer { url: String },
    Show,
}

#[derive(Args, Debug)]
struct VisitCommand {
    #[command(subcommand)]
    command: VisitSubcommand,
}

#[derive(Subcommand, Debug)]
enum VisitSubcommand {
    Submit {
        #[arg(long)]
        client_id: i64,
        #[arg(long, help = "Draft file written from `visit template`")]
        draft: PathBuf,
        #[arg(long, default_value_t = false, help = "Print the assembled payload instead of sending it")]
        dry_run: bool,
    },
    Template,
    Show {
        visit_id: i64,
    },
    Stats,
}

#[derive(Args, Debug)]
struct ReviewCommand {
    #[command(subcommand)]
    command: ReviewSubcommand,
}

#[derive(Subcommand, Debug)]
enum ReviewSubcommand {
    Pending,
    History,
    Stats,
    Validate {
        visit_id: i64,
    },
    Reject {
        visit_id: i64,
    },
    Export {
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Debug, Clone)]
struct CliContext {
    store: SessionStore,
    server: Option<String>,
}

impl CliContext {
    fn session(&self) -> Result<SessionContext, CliError> {
        Ok(self.store.load()?.with_server_override(self.server.as_deref())?)
    }

    fn client(&self) -> Result<ApiClient, CliError> {
        Ok(ApiClient::new(&self.session()?, &ClientConfig::from_env())?)
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let store = match cli.session_file {
        Some(path) => SessionStore::new(path),
        None => SessionStore::at_default_location()?,
    };
    let ctx = CliContext { store, server: cli.server };

    match cli.command {
        Command::Settings(settings) => run_settings(&ctx, settings),
        Command::Login { email, password } => run_login(&ctx, &email, password).await,
        Command::Logout => {
            ctx.store.sign_out()?;
            print_json(&serde_json::json!({ "signed_in": false }))
        }
        Command::Whoami => print_json(&ctx.client()?.me().await?),
        Command::Clients => print_json(&ctx.client()?.clients().await?),
        Command::Products => print_json(&ctx.client()?.products().await?),
        Command::Competitors => print_json(&ctx.client()?.competitors().await?),
        Command::Visit(visit) => run_visit(&ctx, visit).await,
        Command::Review(review) => run_review(&ctx, review).await,
        Command::Admin(admin) => admin::run(&ctx, admin).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_settings(ctx: &CliContext, settings: SettingsCommand) -> Result<(), CliError> {
    match settings.command {
        SettingsSubcommand::SetServer { url } => {
            let stored = ctx.store.set_server(&url)?;
            print_json(&session_summary(ctx, &stored)?)
        }
        SettingsSubcommand::Show => print_json(&session_summary(ctx, &ctx.store.load()?)?),
    }
}

/// Session state safe to print: the token itself is never shown.
///
/// `server` is the address this run talks to, `stored_server` the one saved
/// in the session file; they differ under `--server` or `FIELDVISIT_SERVER`.
fn session_summary(ctx: &CliContext, stored: &SessionContext) -> Result<serde_json::Value, CliError> {
    let effective = stored.clone().with_server_override(ctx.server.as_deref())?;
    Ok(serde_json::json!({
        "server": effective.base_url,
        "stored_server": stored.base_url,
        "signed_in": stored.is_signed_in(),
        "role": stored.role,
        "session_file": ctx.store.path().display().to_string(),
    }))
}

async fn run_login(ctx: &CliContext, email: &str, password: Option<String>) -> Result<(), CliError> {
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };
    if let Some(server) = &ctx.server {
        ctx.store.set_server(server)?;
    }

    let anonymous = SessionContext { token: None, ..ctx.session()? };
    let client = ApiClient::new(&anonymous, &ClientConfig::from_env())?;
    let token = client.login(email, &password).await?;
    let stored = ctx.store.sign_in(&token.access_token, Some(&token.user_role))?;
    print_json(&session_summary(ctx, &stored)?)
}

/// Masked prompt on a terminal; piped stdin is read as one line.
fn prompt_password() -> Result<String, CliError> {
    if io::stdin().is_terminal() {
        let password = dialoguer::Password::new().with_prompt("Password").interact()?;
        return non_empty_password(&password);
    }
    read_password(io::stdin().lock())
}

fn read_password(mut input: impl BufRead) -> Result<String, CliError> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    non_empty_password(line.trim_end_matches(['\r', '\n']))
}

fn non_empty_password(password: &str) -> Result<String, CliError> {
    if password.is_empty() {
        return Err(CliError::MissingPassword);
    }
    Ok(password.to_owned())
}

async fn run_visit(ctx: &CliContext, visit: VisitCommand) -> Result<(), CliError> {
    match visit.command {
        VisitSubcommand::Submit { client_id, draft: path, dry_run } => {
            let file: DraftFile = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
            let client = ctx.client()?;
            let (products, competitors) = tokio::try_join!(client.products(), client.competitors())?;
            let visit = file.build_visit(
                client_id,
                draft::product_candidates(&products),
                draft::competitor_candidates(&competitors),
            )?;
            let payload = assemble_visit(&visit);
            if dry_run {
                return print_json(&payload);
            }
            let created = client.submit_visit(&payload).await?;
            tracing::info!(visit_id = created.id, client_id, "visit submitted");
            print_json(&created)
        }
        VisitSubcommand::Template => print_json(&DraftFile::template()),
        VisitSubcommand::Show { visit_id } => print_json(&ctx.client()?.visit(visit_id).await?),
        VisitSubcommand::Stats => print_json(&ctx.client()?.merchandiser_stats().await?),
    }
}

async fn run_review(ctx: &CliContext, review: ReviewCommand) -> Result<(), CliError> {
    let client = ctx.client()?;
    match review.command {
        ReviewSubcommand::Pending => print_json(&client.pending_visits().await?),
        ReviewSubcommand::History => print_json(&client.visit_history().await?),
        ReviewSubcommand::Stats => print_json(&client.supervisor_stats().await?),
        ReviewSubcommand::Validate { visit_id } => print_json(&client.validate_visit(visit_id).await?),
        ReviewSubcommand::Reject { visit_id } => print_json(&client.reject_visit(visit_id).await?),
        ReviewSubcommand::Export { out } => {
            let csv = client.export_validated_csv().await?;
            std::fs::write(&out, &csv)?;
            print_json(&serde_json::json!({ "path": out.display().to_string(), "bytes": csv.len() }))
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)?;
    println!("{text}");
    Ok(())
}
