//! # Client Command Handler
//!
//! This module handles client-related CLI commands: listing, lookup, creation,
//! update, and name search.

use crate::{
    Client, cli_utils, client_path,
    commands::shared::{dispatch_command, parse_client_or_exit, validate_args_count_or_exit},
    http_utils, search_path,
};

const CLIENT_USAGE: &str = "Usage: rolodexctl client <list|get|create|update|search> [args...]";

/// Handles all client-related commands.
///
/// # Arguments
/// * `args` - Command arguments (first element is the subcommand)
/// * `client` - HTTP client for API communication
/// * `output_format` - Output format for printed records
pub async fn handle_client_command(
    args: &[String],
    client: &http_utils::RolodexClient,
    output_format: cli_utils::OutputFormat,
) {
    dispatch_command!("client", CLIENT_USAGE, args, client, output_format, {
        "list" => handle_client_list,
        "get" => handle_client_get,
        "create" => handle_client_create,
        "update" => handle_client_update,
        "search" => handle_client_search,
    });
}

async fn handle_client_list(
    args: &[String],
    client: &http_utils::RolodexClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(args, 1, 1, "list", "Usage: rolodexctl client list");
    let clients = http_utils::execute_or_exit(
        || client.get::<Vec<Client>>("/clients"),
        "Failed to list clients",
    )
    .await;

    print_clients(&clients, output_format, "No clients found");
}

async fn handle_client_get(
    args: &[String],
    client: &http_utils::RolodexClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(args, 2, 2, "get", "Usage: rolodexctl client get <id>");
    let path = client_path(&args[1]);
    let found = http_utils::execute_or_exit(
        || client.get::<Client>(&path),
        &format!("Failed to get client '{}'", args[1]),
    )
    .await;

    cli_utils::print_formatted_or_exit(&found, output_format, "client");
}

async fn handle_client_create(
    args: &[String],
    client: &http_utils::RolodexClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        2,
        2,
        "create",
        r#"Usage: rolodexctl client create <client-json>
Example: rolodexctl client create '{"id":"A","firstName":"Junvic","lastName":"Valdez","email":"contact@junvic.me","phoneNumber":"+123456789"}'"#,
    );
    let request = parse_client_or_exit(&args[1]);

    let created = http_utils::execute_or_exit(
        || client.post::<Client, Client>("/clients", &request),
        "Failed to create client",
    )
    .await;

    println!("Created client: {}", created.id);
    cli_utils::print_formatted_or_exit(&created, output_format, "client");
}

async fn handle_client_update(
    args: &[String],
    client: &http_utils::RolodexClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        2,
        2,
        "update",
        "Usage: rolodexctl client update <client-json>",
    );
    let request = parse_client_or_exit(&args[1]);

    let updated = http_utils::execute_or_exit(
        || client.put::<Client, Client>("/clients", &request),
        "Failed to update client",
    )
    .await;

    cli_utils::print_formatted_or_exit(&updated, output_format, "client");
}

async fn handle_client_search(
    args: &[String],
    client: &http_utils::RolodexClient,
    output_format: cli_utils::OutputFormat,
) {
    validate_args_count_or_exit(
        args,
        2,
        2,
        "search",
        "Usage: rolodexctl client search <query>",
    );
    let path = search_path(&args[1]);
    let clients = http_utils::execute_or_exit(
        || client.get::<Vec<Client>>(&path),
        "Failed to search clients",
    )
    .await;

    print_clients(
        &clients,
        output_format,
        &format!("No clients match '{}'", args[1]),
    );
}

fn print_clients(clients: &[Client], output_format: cli_utils::OutputFormat, empty: &str) {
    if clients.is_empty() {
        println!("{}", empty);
    } else {
        cli_utils::print_formatted_or_exit(&clients, output_format, "clients");
    }
}
