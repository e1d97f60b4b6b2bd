//! # Shared Command Utilities
//!
//! Argument validation, parsing, and dispatch helpers used by the command handlers.

use crate::{Client, cli_utils};

/// Parses a client from a JSON document, exiting with an error if it is malformed.
pub fn parse_client_or_exit(json: &str) -> Client {
    parse_client(json).unwrap_or_else(|e| cli_utils::exit_with_error(&e))
}

/// Parses a client from a JSON document.
pub fn parse_client(json: &str) -> Result<Client, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid client JSON: {}", e))
}

/// Validates both minimum and maximum argument counts.
///
/// # Arguments
/// * `args` - The command arguments array
/// * `min_count` - The minimum number of arguments required (including subcommand)
/// * `max_count` - The maximum number of arguments allowed (including subcommand)
/// * `command` - The command name for error message
/// * `usage` - The usage string to display
pub fn validate_args_count_or_exit(
    args: &[String],
    min_count: usize,
    max_count: usize,
    command: &str,
    usage: &str,
) {
    if let Err(message) = check_args_count(args, min_count, max_count, command) {
        cli_utils::exit_with_usage_error(&message, usage);
    }
}

fn check_args_count(
    args: &[String],
    min_count: usize,
    max_count: usize,
    command: &str,
) -> Result<(), String> {
    if args.len() < min_count {
        return Err(format!("{} command requires more arguments", command));
    }
    if args.len() > max_count {
        return Err(format!("{} command has too many arguments", command));
    }
    Ok(())
}

/// Macro to generate command dispatcher boilerplate.
macro_rules! dispatch_command {
    ($command_name:expr, $usage:expr, $args:expr, $client:expr, $output_format:expr, {
        $($subcommand:expr => $handler:expr),* $(,)?
    }) => {
        if $args.is_empty() {
            crate::cli_utils::exit_with_usage_error(
                &format!("{} command requires a subcommand", $command_name),
                $usage,
            );
        }

        match $args[0].as_str() {
            $(
                $subcommand => $handler($args, $client, $output_format).await,
            )*
            _ => {
                let available_subcommands = [$($subcommand),*];
                crate::cli_utils::exit_with_error(&format!(
                    "Unknown {} subcommand '{}'. Available subcommands: {}",
                    $command_name,
                    $args[0],
                    available_subcommands.join(", ")
                ));
            }
        }
    };
}

pub(crate) use dispatch_command;

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_client_json() {
        let client = parse_client(r#"{"id": "A", "firstName": "Junvic"}"#).unwrap();
        assert_eq!(client.id, "A");
        assert_eq!(client.first_name, "Junvic");
        assert_eq!(client.email, "");
    }

    #[test]
    fn rejects_malformed_client_json() {
        let error = parse_client("{\"id\": ").unwrap_err();
        assert!(error.starts_with("Invalid client JSON"));
    }

    #[test]
    fn argument_counts_are_bounded() {
        assert!(check_args_count(&args(&["get", "A"]), 2, 2, "get").is_ok());
        assert_eq!(
            check_args_count(&args(&["get"]), 2, 2, "get"),
            Err("get command requires more arguments".to_string())
        );
        assert_eq!(
            check_args_count(&args(&["get", "A", "B"]), 2, 2, "get"),
            Err("get command has too many arguments".to_string())
        );
    }
}
