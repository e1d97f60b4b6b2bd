use arrrg::CommandLine;
use arrrg_derive::CommandLine;

use rolodex::{
    cli_utils::{self, OutputFormat},
    commands::handle_client_command,
    http_utils,
};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Base URL of the rolodex server")]
    base_url: String,
    #[arrrg(optional, "Output format for printed records: json or yaml (default: json)")]
    output: OutputFormat,
}

const USAGE: &str = r#"Usage: rolodexctl [options] <command> [args...]

Options:
  --base-url <url>     Base URL of the rolodex server (default: http://localhost:8080)
  --output <format>    Output format for printed records: json or yaml (default: json)

Commands:
  client list                     List all clients
  client get <id>                 Get a client by id
  client create <client-json>     Create a client
  client update <client-json>     Update the client with the same id
  client search <query>           Search first and last names"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (options, free) =
        Options::from_command_line_relaxed("USAGE: rolodexctl <command> [args...]");

    if free.is_empty() {
        cli_utils::exit_with_usage_error("No command specified", USAGE);
    }

    let base_url = if options.base_url.is_empty() {
        "http://localhost:8080".to_string()
    } else {
        options.base_url
    };

    let client = http_utils::RolodexClient::new(base_url);

    match free[0].as_str() {
        "client" => {
            handle_client_command(&free[1..], &client, options.output).await;
        }
        _ => {
            cli_utils::exit_with_error(&format!(
                "Unknown command '{}'. Available commands: client",
                free[0]
            ));
        }
    }

    Ok(())
}
