//! # Client Repository
//!
//! This module owns the canonical collection of [`Client`] records. The
//! [`ClientRepository`] trait is the storage seam used by the HTTP layer and the
//! daemon; [`InMemoryClientRepository`] is the only backend and stands in for a
//! database.
//!
//! The repository assumes its callers validated records beforehand. Its only
//! ordinary "failure" is not finding something, which is reported as `Ok(None)`
//! or `Ok(false)` rather than an error.
//!
//! ## Usage Examples
//!
//! ```rust
//! use rolodex::{Client, ClientRepository, InMemoryClientRepository};
//!
//! let repository = InMemoryClientRepository::new();
//! let client = Client::new("A", "Junvic", "Valdez", "contact@junvic.me", "+123456789");
//! repository.create(&client).unwrap();
//!
//! assert_eq!(repository.find_by_id("A").unwrap(), Some(client));
//! assert_eq!(repository.search("VALDEZ").unwrap().len(), 1);
//! assert!(repository.find_by_id("B").unwrap().is_none());
//! ```

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::{Client, RepositoryError};

/// Storage interface for client records.
///
/// Implementors must be safe to share across threads; every method may be called
/// concurrently from many request handlers.
pub trait ClientRepository: Send + Sync {
    /// Returns every stored client in a stable order.
    fn get_all(&self) -> Result<Vec<Client>, RepositoryError>;

    /// Stores a new client.
    ///
    /// # Returns
    /// * `Ok(())` - Client stored
    /// * `Err(RepositoryError::AlreadyExists)` - A client with this id is already stored
    fn create(&self, client: &Client) -> Result<(), RepositoryError>;

    /// Overwrites the non-id fields of the stored client sharing `client.id`.
    ///
    /// # Returns
    /// * `Ok(true)` - Client existed and was updated
    /// * `Ok(false)` - No client with this id; nothing changed
    fn update(&self, client: &Client) -> Result<bool, RepositoryError>;

    /// Looks up a client by id.
    fn find_by_id(&self, id: &str) -> Result<Option<Client>, RepositoryError>;

    /// Returns clients whose first or last name contains `query`, ignoring case.
    fn search(&self, query: &str) -> Result<Vec<Client>, RepositoryError>;
}

#[derive(Debug, Default)]
struct ClientRows {
    rows: Vec<Client>,
    index: HashMap<String, usize>,
}

/// Thread-safe in-memory client repository.
///
/// Records are kept in insertion order behind a single `Mutex`, with an id index
/// for lookups. Nothing is ever removed through [`ClientRepository`], so indices
/// into the row vector stay valid until [`InMemoryClientRepository::clear`].
#[derive(Debug, Default)]
pub struct InMemoryClientRepository {
    clients: Mutex<ClientRows>,
}

impl InMemoryClientRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `clients`.
    ///
    /// Fails with `AlreadyExists` if two of the supplied clients share an id.
    pub fn with_clients(
        clients: impl IntoIterator<Item = Client>,
    ) -> Result<Self, RepositoryError> {
        let repository = Self::new();
        for client in clients {
            repository.create(&client)?;
        }
        Ok(repository)
    }

    /// Returns the number of stored clients.
    pub fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.lock()?.rows.len())
    }

    /// Removes every client. Intended for test harnesses that reuse a store.
    pub fn clear(&self) -> Result<(), RepositoryError> {
        let mut clients = self.lock()?;
        clients.rows.clear();
        clients.index.clear();
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ClientRows>, RepositoryError> {
        self.clients
            .lock()
            .map_err(|_| RepositoryError::Internal("client store lock poisoned".to_string()))
    }
}

impl ClientRepository for InMemoryClientRepository {
    fn get_all(&self) -> Result<Vec<Client>, RepositoryError> {
        Ok(self.lock()?.rows.clone())
    }

    fn create(&self, client: &Client) -> Result<(), RepositoryError> {
        let mut clients = self.lock()?;
        if clients.index.contains_key(&client.id) {
            return Err(RepositoryError::AlreadyExists(client.id.clone()));
        }
        let position = clients.rows.len();
        clients.index.insert(client.id.clone(), position);
        clients.rows.push(client.clone());
        Ok(())
    }

    fn update(&self, client: &Client) -> Result<bool, RepositoryError> {
        let mut clients = self.lock()?;
        let Some(&position) = clients.index.get(&client.id) else {
            return Ok(false);
        };
        clients.rows[position].apply_update(client);
        Ok(true)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Client>, RepositoryError> {
        let clients = self.lock()?;
        Ok(clients
            .index
            .get(id)
            .map(|&position| clients.rows[position].clone()))
    }

    fn search(&self, query: &str) -> Result<Vec<Client>, RepositoryError> {
        let needle = query.to_lowercase();
        let clients = self.lock()?;
        Ok(clients
            .rows
            .iter()
            .filter(|client| {
                client.first_name.to_lowercase().contains(&needle)
                    || client.last_name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }
}
