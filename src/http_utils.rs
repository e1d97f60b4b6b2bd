use std::error::Error;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{ProblemDetails, cli_utils};

/// A non-2xx response from a rolodex server.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct HttpError {
    /// The response status.
    pub status: StatusCode,
    /// A human-readable rendering of the response body.
    pub message: String,
}

impl HttpError {
    fn from_body(status: StatusCode, body: &str) -> Self {
        let message = match serde_json::from_str::<ProblemDetails>(body) {
            Ok(problem) => render_problem(&problem),
            Err(_) if body.is_empty() => format!("{} (no error details)", status),
            Err(_) => body.to_string(),
        };
        Self { status, message }
    }
}

fn render_problem(problem: &ProblemDetails) -> String {
    let mut message = format!("{} ({})", problem.title, problem.status);
    for (field, messages) in &problem.errors {
        for text in messages {
            message.push_str(&format!("\n  {}: {}", field, text));
        }
    }
    message
}

/// HTTP client for the rolodex API.
pub struct RolodexClient {
    client: Client,
    base_url: String,
}

impl RolodexClient {
    /// Creates a client for the server at `base_url`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Constructs a full URL from an API path such as `/clients`.
    pub fn api_url(&self, path: &str) -> String {
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{}/{}", self.base_url, path)
    }

    /// Makes a GET request and handles the response
    pub async fn get<T>(&self, path: &str) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        let response = self.client.get(&url).send().await?;
        self.handle_response(response).await
    }

    /// Makes a POST request with JSON body and handles the response
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, Box<dyn Error>>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        let response = self.client.post(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Makes a PUT request with JSON body and handles the response
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, Box<dyn Error>>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let url = self.api_url(path);
        let response = self.client.put(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Handles HTTP response, deserializing success or returning error
    async fn handle_response<T>(&self, response: Response) -> Result<T, Box<dyn Error>>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Box::new(HttpError::from_body(status, &body)))
        }
    }
}

/// Execute an HTTP operation and exit on error with formatted message
pub async fn execute_or_exit<T, F, Fut>(operation: F, context: &str) -> T
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, Box<dyn Error>>>,
{
    match operation().await {
        Ok(result) => result,
        Err(e) => cli_utils::exit_with_error(&format!("{}: {}", context, e)),
    }
}
