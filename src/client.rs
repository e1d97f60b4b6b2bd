use std::sync::Arc;

use axum::Router;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Json;
use axum::routing::get;
use serde::{Deserialize, Serialize};

use crate::{ApiError, ClientRepository, EventPublisher, validate_client};

/////////////////////////////////////////////// Client ////////////////////////////////////////////////

/// A client contact record.
///
/// Every field is required for a record to be admitted, but missing fields
/// deserialize to empty strings so that validation, not deserialization, reports
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Client {
    /// Caller-supplied unique identifier.
    pub id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email address.
    pub email: String,
    /// Contact phone number, free-form.
    pub phone_number: String,
}

impl Client {
    /// Creates a client from its five fields.
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
        }
    }

    /// Copies every field except `id` from `other`.
    pub fn apply_update(&mut self, other: &Client) {
        self.first_name.clone_from(&other.first_name);
        self.last_name.clone_from(&other.last_name);
        self.email.clone_from(&other.email);
        self.phone_number.clone_from(&other.phone_number);
    }
}

/// Returns the resource path of the client with `id`, percent-encoding the id.
pub fn client_path(id: &str) -> String {
    format!("/clients/{}", encode_path_segment(id))
}

/// Returns the search path for `query`, percent-encoding the query.
pub fn search_path(query: &str) -> String {
    format!("/clients/search/{}", encode_path_segment(query))
}

fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

/// Extracts a [`Client`] body from either JSON or YAML based on Content-Type.
pub struct ClientBody(pub Client);

#[async_trait]
impl<S> FromRequest<S> for ClientBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let content_type = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();

        let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(|_| ApiError::BadRequest("failed to read request body".to_string()))?;

        let client = if content_type.contains("yaml") || content_type.contains("yml") {
            serde_yml::from_slice::<Client>(&bytes)
                .map_err(|e| ApiError::BadRequest(format!("invalid yaml: {}", e)))?
        } else {
            serde_json::from_slice::<Client>(&bytes)
                .map_err(|e| ApiError::BadRequest(format!("invalid json: {}", e)))?
        };

        Ok(ClientBody(client))
    }
}

////////////////////////////////////////////// Routes //////////////////////////////////////////////////

/// Shared state behind the client routes.
#[derive(Clone)]
pub struct ClientApiState {
    repository: Arc<dyn ClientRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl ClientApiState {
    /// Bundles a repository and a publisher.
    pub fn new(repository: Arc<dyn ClientRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            repository,
            publisher,
        }
    }
}

/// Lists every client.
async fn list_clients(State(state): State<ClientApiState>) -> Result<Json<Vec<Client>>, ApiError> {
    let clients = state.repository.get_all()?;
    tracing::debug!(count = clients.len(), "listed clients");
    Ok(Json(clients))
}

/// Validates and stores a new client, then announces it.
async fn create_client(
    State(state): State<ClientApiState>,
    ClientBody(client): ClientBody,
) -> Result<(StatusCode, HeaderMap, Json<Client>), ApiError> {
    validate_client(&client)?;
    state.repository.create(&client)?;
    tracing::info!(client_id = %client.id, "client created");
    state.publisher.notify_created(&client);

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&client_path(&client.id))
        .map_err(|e| ApiError::Internal(format!("unencodable location header: {}", e)))?;
    headers.insert(LOCATION, location);
    Ok((StatusCode::CREATED, headers, Json(client)))
}

/// Validates a client and overwrites the stored record with the same id.
///
/// An unknown id is not an error: nothing is stored and the submitted client is
/// echoed back unchanged.
async fn update_client(
    State(state): State<ClientApiState>,
    ClientBody(client): ClientBody,
) -> Result<Json<Client>, ApiError> {
    validate_client(&client)?;
    if state.repository.update(&client)? {
        tracing::info!(client_id = %client.id, "client updated");
        state.publisher.notify_updated(&client);
    } else {
        tracing::debug!(client_id = %client.id, "update ignored for unknown client");
    }
    Ok(Json(client))
}

/// Searches first and last names; a blank query matches nothing.
async fn search_clients(
    State(state): State<ClientApiState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<Client>>, ApiError> {
    if query.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }
    let clients = state.repository.search(&query)?;
    tracing::debug!(%query, count = clients.len(), "searched clients");
    Ok(Json(clients))
}

/// Gets a client by id.
async fn get_client(
    State(state): State<ClientApiState>,
    Path(id): Path<String>,
) -> Result<Json<Client>, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::BadRequest("Provide a valid id.".to_string()));
    }
    state
        .repository
        .find_by_id(&id)?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

////////////////////////////////////////////// Router //////////////////////////////////////////////////

/// Creates an Axum router with the client endpoints.
pub fn create_client_router(
    repository: Arc<dyn ClientRepository>,
    publisher: Arc<dyn EventPublisher>,
) -> Router {
    Router::new()
        .route(
            "/clients",
            get(list_clients).post(create_client).put(update_client),
        )
        .route("/clients/search/:query", get(search_clients))
        .route("/clients/:id", get(get_client))
        .with_state(ClientApiState::new(repository, publisher))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::{john_smith, junvic, wait_for_events};
    use crate::{
        ChannelEventPublisher, ClientEventKind, EventLog, InMemoryClientRepository,
        NoopEventPublisher,
    };

    fn test_state() -> (ClientApiState, Arc<InMemoryClientRepository>) {
        let repository = Arc::new(InMemoryClientRepository::new());
        let state = ClientApiState::new(repository.clone(), Arc::new(NoopEventPublisher));
        (state, repository)
    }

    #[test]
    fn client_uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(junvic()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "junvic",
                "firstName": "Junvic",
                "lastName": "Valdez",
                "email": "contact@junvic.me",
                "phoneNumber": "+123456789"
            })
        );
    }

    #[test]
    fn missing_fields_deserialize_empty() {
        let client: Client = serde_json::from_str(r#"{"id": "A"}"#).unwrap();
        assert_eq!(client.id, "A");
        assert_eq!(client.first_name, "");
        assert_eq!(client.phone_number, "");
    }

    #[test]
    fn apply_update_keeps_id() {
        let mut stored = junvic();
        stored.apply_update(&john_smith());
        assert_eq!(stored.id, "junvic");
        assert_eq!(stored.first_name, "John");
        assert_eq!(stored.email, "johnsmith@gmail.com");
    }

    #[test]
    fn paths_percent_encode_segments() {
        assert_eq!(client_path("A"), "/clients/A");
        assert_eq!(client_path("a b/c"), "/clients/a%20b%2Fc");
        assert_eq!(search_path("José"), "/clients/search/Jos%C3%A9");
    }

    #[tokio::test]
    async fn create_returns_created_with_location() {
        let (state, repository) = test_state();

        let (status, headers, Json(body)) = create_client(State(state), ClientBody(junvic()))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(headers[LOCATION], "/clients/junvic");
        assert_eq!(body, junvic());
        assert_eq!(repository.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn create_invalid_client_stores_nothing() {
        let (state, repository) = test_state();

        let result = create_client(State(state), ClientBody(Client::default())).await;

        match result {
            Err(ApiError::Validation(errors)) => assert_eq!(errors.len(), 5),
            other => panic!("expected validation error, got {:?}", other.map(|r| r.0)),
        }
        assert_eq!(repository.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn create_duplicate_is_conflict() {
        let (state, _repository) = test_state();
        create_client(State(state.clone()), ClientBody(junvic()))
            .await
            .unwrap();

        let result = create_client(State(state), ClientBody(junvic())).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[tokio::test]
    async fn create_publishes_one_created_event() {
        let log = Arc::new(EventLog::new());
        let (publisher, _handle) = ChannelEventPublisher::spawn(log.clone());
        let state = ClientApiState::new(
            Arc::new(InMemoryClientRepository::new()),
            Arc::new(publisher),
        );

        create_client(State(state), ClientBody(junvic()))
            .await
            .unwrap();
        wait_for_events(&log, 1).await;

        let events = log.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ClientEventKind::Created);
        assert_eq!(events[0].client, junvic());
    }

    #[tokio::test]
    async fn update_unknown_client_echoes_without_storing() {
        let (state, repository) = test_state();

        let Json(body) = update_client(State(state), ClientBody(junvic()))
            .await
            .unwrap();

        assert_eq!(body, junvic());
        assert_eq!(repository.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn update_invalid_client_is_rejected() {
        let (state, repository) = test_state();
        repository.create(&junvic()).unwrap();

        let partial = Client {
            id: junvic().id,
            ..Client::default()
        };
        let result = update_client(State(state), ClientBody(partial)).await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(
            repository.find_by_id(&junvic().id).unwrap(),
            Some(junvic())
        );
    }

    #[tokio::test]
    async fn search_with_blank_query_is_empty() {
        let (state, repository) = test_state();
        repository.create(&junvic()).unwrap();

        let Json(results) = search_clients(State(state), Path("   ".to_string()))
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn get_client_distinguishes_blank_and_missing() {
        let (state, repository) = test_state();
        repository.create(&junvic()).unwrap();

        let blank = get_client(State(state.clone()), Path(" ".to_string())).await;
        assert!(matches!(blank, Err(ApiError::BadRequest(_))));

        let missing = get_client(State(state.clone()), Path("nobody".to_string())).await;
        assert!(matches!(missing, Err(ApiError::NotFound)));

        let Json(found) = get_client(State(state), Path("junvic".to_string()))
            .await
            .unwrap();
        assert_eq!(found, junvic());
    }
}
