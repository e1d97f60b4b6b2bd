use std::path::PathBuf;
use std::sync::Arc;

use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use tokio::net::TcpListener;
use tokio::signal;

use rolodex::config::{DEFAULT_HOST, DEFAULT_PORT, ServerConfig, seed_repository};
use rolodex::telemetry::init_tracing;
use rolodex::{ChannelEventPublisher, EventLog, InMemoryClientRepository, create_client_router};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Args {
    #[arrrg(optional, "JSON or YAML file of clients to load at startup")]
    seed: Option<String>,
    #[arrrg(optional, "Host to bind the HTTP server")]
    host: Option<String>,
    #[arrrg(optional, "Port to bind the HTTP server")]
    port: Option<u16>,
    #[arrrg(flag, "Enable verbose logging")]
    verbose: bool,
    #[arrrg(flag, "Emit logs as JSON lines")]
    json_logs: bool,
}

const HELP_TEXT: &str = r#"rolodexd - Rolodex client records daemon

USAGE:
    rolodexd [OPTIONS]

OPTIONS:
    --seed <PATH>        JSON or YAML file of clients to load at startup
    --host <HOST>        Host to bind the HTTP server [default: 127.0.0.1]
    --port <PORT>        Port to bind the HTTP server [default: 8080]
    --verbose            Enable verbose logging
    --json-logs          Emit logs as JSON lines

DESCRIPTION:
    Serves client contact records from an in-memory store. RUST_LOG
    overrides the default log level.

    The server supports graceful shutdown via Ctrl+C.

API ENDPOINTS:
    GET    /clients                  List all clients
    POST   /clients                  Create a client
    PUT    /clients                  Update a client
    GET    /clients/search/{query}   Search first and last names
    GET    /clients/{id}             Get a specific client"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = Args::from_command_line("USAGE: rolodexd [OPTIONS]");

    if !free.is_empty() && free[0] == "help" {
        println!("{}", HELP_TEXT);
        return Ok(());
    }

    let config = server_config(args);
    init_tracing(config.json_logs, config.log_level());

    let repository = Arc::new(InMemoryClientRepository::new());
    if let Some(seed) = &config.seed {
        seed_repository(repository.as_ref(), seed)?;
    }

    let event_log = Arc::new(EventLog::new());
    let (publisher, events_task) = ChannelEventPublisher::spawn(event_log.clone());

    let app = create_client_router(repository, Arc::new(publisher));

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!(%addr, "rolodex daemon listening");

    let shutdown_signal = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!(error = %e, "server error");
                std::process::exit(1);
            }
        }
        () = shutdown_signal => {
            tracing::info!(
                events_published = event_log.len(),
                "shutdown signal received, stopping server"
            );
        }
    }

    events_task.abort();
    Ok(())
}

fn server_config(args: Args) -> ServerConfig {
    ServerConfig {
        host: args.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
        port: args.port.unwrap_or(DEFAULT_PORT),
        seed: args.seed.map(PathBuf::from),
        verbose: args.verbose,
        json_logs: args.json_logs,
    }
}
