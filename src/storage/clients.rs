//! Client repository for JSON storage
//!
//! Manages loading and saving clients to clients.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Client, ClientId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable client collection
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ClientData {
    clients: Vec<Client>,
}

/// Repository for client persistence
pub struct ClientRepository {
    path: PathBuf,
    data: RwLock<HashMap<ClientId, Client>>,
}

impl ClientRepository {
    /// Create a new client repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load clients from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: ClientData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        for client in file_data.clients {
            data.insert(client.id, client);
        }

        Ok(())
    }

    /// Save clients to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let clients = self.get_all()?;
        write_json_atomic(&self.path, &ClientData { clients })
    }

    /// Get a client by ID
    pub fn get(&self, id: ClientId) -> Result<Option<Client>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all clients ordered by construction start (oldest first), then name
    pub fn get_all(&self) -> Result<Vec<Client>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut clients: Vec<_> = data.values().cloned().collect();
        clients.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.display_name().cmp(&b.display_name()))
        });
        Ok(clients)
    }

    /// Get a client by its business-facing number
    pub fn get_by_number(&self, number: &str) -> Result<Option<Client>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let number = number.trim();
        Ok(data.values().find(|c| c.client_number == number).cloned())
    }

    /// Insert or update a client
    pub fn upsert(&self, client: Client) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.insert(client.id, client);
        Ok(())
    }

    /// Delete a client
    pub fn delete(&self, id: ClientId) -> Result<bool, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        Ok(data.remove(&id).is_some())
    }

    /// Count clients
    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}
