//! Command-line front end for the workbench.
//!
//! Sends requests, manages environments and collections, and browses the
//! request history. Workspace data lives in JSON files under the data
//! directory (`storageDir` in the settings file, or `--data-dir`).
//!
//! Logging goes to stderr through `env_logger`; `RUST_LOG` overrides the
//! default level.

use clap::{Args, Parser, Subcommand};
use rest_workbench::config::{self, WorkbenchConfig};
use rest_workbench::formatter::{format_history_line, format_response};
use rest_workbench::history::search_history;
use rest_workbench::models::{ApiRequest, FormField, HttpMethod, RequestBody};
use rest_workbench::store::{FileStorage, StoreError, Workspace};
use rest_workbench::executor::SharedRequestTracker;
use rest_workbench::{ExecutionConfig, ReqwestTransport, Workbench};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Debug, Parser)]
#[command(version, about = "Send HTTP requests against saved environments and collections")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON settings file with a "rest-workbench" section
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding collections, environments and history
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Send a request
    Send(SendArgs),

    /// Send a request saved in a collection
    Run {
        /// Collection name
        collection: String,
        /// Request name or id
        request: String,
        /// Environment to use instead of the active one
        #[arg(long)]
        env: Option<String>,
    },

    /// Show or clear the request history
    History(HistoryArgs),

    /// Manage environments
    #[command(subcommand)]
    Env(EnvCommand),

    /// Manage collections
    #[command(subcommand)]
    Collection(CollectionCommand),
}

#[derive(Debug, Args)]
struct SendArgs {
    /// HTTP method (GET, POST, PUT, DELETE, PATCH, OPTIONS, HEAD)
    method: HttpMethod,

    /// Target URL; may contain {{variable}} tokens
    url: String,

    /// Header in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Query parameter in 'key=value' format (repeatable)
    #[arg(long = "query", short = 'q', value_parser = parse_pair)]
    params: Vec<(String, String)>,

    /// Raw request body
    #[arg(long, conflicts_with_all = ["form", "form_file"])]
    raw: Option<String>,

    /// Multipart text field in 'key=value' format (repeatable)
    #[arg(long, value_parser = parse_pair)]
    form: Vec<(String, String)>,

    /// Multipart file field in 'key=path' format (repeatable)
    #[arg(long = "form-file", value_parser = parse_pair)]
    form_file: Vec<(String, String)>,

    /// Environment to use instead of the active one
    #[arg(long)]
    env: Option<String>,

    /// Save the request into this collection (created if missing)
    #[arg(long)]
    save: Option<String>,

    /// Name for the saved request
    #[arg(long)]
    name: Option<String>,
}

#[derive(Debug, Args)]
struct HistoryArgs {
    #[command(subcommand)]
    action: Option<HistoryAction>,

    /// Show at most this many entries
    #[arg(long, default_value_t = 20)]
    limit: usize,

    /// Only show entries matching this text
    #[arg(long)]
    search: Option<String>,
}

#[derive(Debug, Subcommand)]
enum HistoryAction {
    /// Delete every history entry
    Clear,
}

#[derive(Debug, Subcommand)]
enum EnvCommand {
    /// List environments
    List,
    /// Make an environment active
    Use { name: String },
    /// Deactivate the active environment
    Clear,
    /// Import an environment from a JSON file
    Import { file: PathBuf },
    /// Add 'key=value' lines from a file to an environment
    Bulk { name: String, file: PathBuf },
}

#[derive(Debug, Subcommand)]
enum CollectionCommand {
    /// List collections and their requests
    List,
    /// Import a collection from a JSON file
    Import { file: PathBuf },
    /// Print a collection as JSON
    Export { name: String },
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once(':')
        .ok_or_else(|| format!("header must be 'Key: Value', got '{}'", s))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected 'key=value', got '{}'", s))?;
    Ok((key.trim().to_string(), value.to_string()))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(None)?,
    };
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.storage_path());
    let storage = FileStorage::new(data_dir);
    let mut workspace = Workspace::load(&storage, config.history_limit)?;
    log::debug!("Workspace loaded from {}", storage.dir().display());

    match cli.command {
        Command::Send(args) => {
            let (request, env, save) = build_request(args);
            if let Some(collection) = save {
                save_into_collection(&mut workspace, &collection, request.clone())?;
            }
            let (workspace, result) = send(workspace, &config, &request, env.as_deref()).await;
            workspace.save(&storage)?;
            result?;
        }
        Command::Run {
            collection,
            request,
            env,
        } => {
            let saved = find_saved_request(&workspace, &collection, &request)?;
            let (workspace, result) = send(workspace, &config, &saved, env.as_deref()).await;
            workspace.save(&storage)?;
            result?;
        }
        Command::History(args) => {
            if let Some(HistoryAction::Clear) = args.action {
                workspace.clear_history();
                workspace.save(&storage)?;
                println!("History cleared");
            } else {
                print_history(&workspace, args.search.as_deref(), args.limit);
            }
        }
        Command::Env(command) => {
            env_command(&mut workspace, command)?;
            workspace.save(&storage)?;
        }
        Command::Collection(command) => {
            collection_command(&mut workspace, command)?;
            workspace.save(&storage)?;
        }
    }

    Ok(())
}

fn build_request(args: SendArgs) -> (ApiRequest, Option<String>, Option<String>) {
    let mut request = ApiRequest::new(args.method, args.url);
    if let Some(name) = args.name {
        request = request.with_name(name);
    }
    for (key, value) in args.headers {
        request = request.with_header(key, value);
    }
    for (key, value) in args.params {
        request = request.with_param(key, value);
    }

    if let Some(raw) = args.raw {
        request = request.with_body(RequestBody::raw(raw));
    } else if !args.form.is_empty() || !args.form_file.is_empty() {
        let fields = args
            .form
            .into_iter()
            .map(|(key, value)| FormField::text(key, value))
            .chain(
                args.form_file
                    .into_iter()
                    .map(|(key, path)| FormField::file(key, path)),
            )
            .collect();
        request = request.with_body(RequestBody::form_data(fields));
    }

    (request, args.env, args.save)
}

/// Sends one request and prints the response.
///
/// The workspace is always handed back, with the attempt recorded in its
/// history when one was made, so the caller can persist it even on failure.
async fn send(
    workspace: Workspace,
    config: &WorkbenchConfig,
    request: &ApiRequest,
    env_name: Option<&str>,
) -> (Workspace, CliResult<()>) {
    let environment = match env_name {
        Some(name) => {
            let found = workspace.environment_by_name(name).cloned();
            match found {
                Some(env) => Some(env),
                None => return (workspace, Err(not_found("environment", name))),
            }
        }
        None => workspace.active_environment().cloned(),
    };

    let transport = match ReqwestTransport::new(&ExecutionConfig::from(config)) {
        Ok(transport) => transport,
        Err(e) => return (workspace, Err(e.into())),
    };
    let mut workbench = Workbench::new(workspace, Arc::new(transport), config);

    let tracker = workbench.tracker();
    let interrupt = tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if let Some(code) = interrupt_send(&tracker) {
                std::process::exit(code);
            }
        }
    });

    let result = workbench
        .send_with_environment(request, environment.as_ref())
        .await;
    interrupt.abort();

    let result = match result {
        Ok(outcome) => {
            for name in &outcome.unresolved {
                eprintln!("warning: variable '{}' is not defined", name);
            }
            print!("{}", format_response(&outcome.response));
            Ok(())
        }
        Err(e) => Err(e.into()),
    };
    (workbench.into_workspace(), result)
}

/// Exit status of a process stopped by Ctrl+C.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Handles one Ctrl+C during a send.
///
/// Cancels the in-flight request if there is one. Otherwise returns the exit
/// code the process should stop with.
fn interrupt_send(tracker: &SharedRequestTracker) -> Option<i32> {
    match tracker.cancel_most_recent() {
        Ok(id) => {
            log::info!("Cancelled request {}", id);
            None
        }
        Err(e) => {
            log::debug!("Nothing to cancel ({}), exiting", e);
            Some(INTERRUPTED_EXIT_CODE)
        }
    }
}

fn find_saved_request(workspace: &Workspace, collection: &str, request: &str) -> CliResult<ApiRequest> {
    let found = workspace
        .collection_by_name(collection)
        .ok_or_else(|| not_found("collection", collection))?;
    let saved = found
        .requests
        .iter()
        .find(|r| r.name == request || r.id == request)
        .ok_or_else(|| not_found("request", request))?;
    Ok(saved.clone())
}

fn save_into_collection(workspace: &mut Workspace, name: &str, request: ApiRequest) -> CliResult<()> {
    let collection_id = match workspace.collection_by_name(name) {
        Some(collection) => collection.id.clone(),
        None => workspace.add_collection(name)?.id.clone(),
    };
    workspace.save_request(&collection_id, request)?;
    Ok(())
}

fn print_history(workspace: &Workspace, search: Option<&str>, limit: usize) {
    let entries = workspace.history().entries();
    let matching: Vec<_> = match search {
        Some(query) => search_history(query, entries),
        None => entries.iter().collect(),
    };

    if matching.is_empty() {
        println!("No history");
        return;
    }
    for entry in matching.into_iter().take(limit) {
        println!("{}", format_history_line(entry));
    }
    log::debug!(
        "History holds {} of at most {} entries",
        entries.len(),
        workspace.history().max_entries()
    );
}

fn env_command(workspace: &mut Workspace, command: EnvCommand) -> CliResult<()> {
    match command {
        EnvCommand::List => {
            let active = workspace.active_environment_id().map(str::to_string);
            for env in workspace.environments() {
                let marker = if active.as_deref() == Some(env.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!("{} {} ({} variables)", marker, env.name, env.len());
            }
        }
        EnvCommand::Use { name } => {
            let id = environment_id(workspace, &name)?;
            workspace.set_active_environment(Some(&id))?;
            println!("Active environment: {}", name);
        }
        EnvCommand::Clear => {
            workspace.set_active_environment(None)?;
            println!("No active environment");
        }
        EnvCommand::Import { file } => {
            let json = std::fs::read_to_string(&file)?;
            let env = workspace.import_environment(&json)?;
            println!("Imported environment {} ({} variables)", env.name, env.len());
        }
        EnvCommand::Bulk { name, file } => {
            let text = std::fs::read_to_string(&file)?;
            let id = environment_id(workspace, &name)?;
            let added = workspace.bulk_import_variables(&id, &text)?;
            println!("Added {} variables to {}", added, name);
        }
    }
    Ok(())
}

fn collection_command(workspace: &mut Workspace, command: CollectionCommand) -> CliResult<()> {
    match command {
        CollectionCommand::List => {
            for collection in workspace.collections() {
                println!("{} ({} requests)", collection.name, collection.requests.len());
                for request in &collection.requests {
                    println!("  {:<7} {}  {}", request.method.as_str(), request.name, request.url);
                }
            }
        }
        CollectionCommand::Import { file } => {
            let json = std::fs::read_to_string(&file)?;
            let collection = workspace.import_collection(&json)?;
            println!(
                "Imported collection {} ({} requests)",
                collection.name,
                collection.requests.len()
            );
        }
        CollectionCommand::Export { name } => {
            let id = workspace
                .collection_by_name(&name)
                .map(|c| c.id.clone())
                .ok_or_else(|| not_found("collection", &name))?;
            println!("{}", workspace.export_collection(&id)?);
        }
    }
    Ok(())
}

fn environment_id(workspace: &Workspace, name: &str) -> CliResult<String> {
    workspace
        .environment_by_name(name)
        .map(|env| env.id.clone())
        .ok_or_else(|| not_found("environment", name))
}

fn not_found(kind: &'static str, name: &str) -> Box<dyn Error> {
    Box::new(StoreError::NotFound {
        kind,
        id: name.to_string(),
    })
}
