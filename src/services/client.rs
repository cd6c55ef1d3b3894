//! Client service
//!
//! Provides business logic for clients under construction: registration,
//! lookup, stage changes, card icon visibility, payment history and
//! payment progress.

use chrono::{DateTime, Utc};

use crate::audit::{AuditEntry, EntityType, Operation};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Client, ClientId, ClientStage, Money, PaymentProgress, Transaction};
use crate::storage::Storage;

/// Service for client management
pub struct ClientService<'a> {
    storage: &'a Storage,
}

/// Input for registering a new client
#[derive(Debug, Clone, Default)]
pub struct CreateClientInput {
    pub first_name: String,
    pub last_name: String,
    pub client_number: String,
    pub construction_days: u32,
    pub object_name: Option<String>,
    pub phone: Option<String>,
    pub construction_address: Option<String>,
    pub contract_amount: Option<Money>,
    pub stage: Option<ClientStage>,
    /// Construction start; defaults to now
    pub started_at: Option<DateTime<Utc>>,
}

impl<'a> ClientService<'a> {
    /// Create a new client service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new client
    pub fn create(&self, input: CreateClientInput) -> LedgerResult<Client> {
        let number = input.client_number.trim();
        if self.storage.clients.get_by_number(number)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Client",
                identifier: number.to_string(),
            });
        }

        let mut client = Client::new(
            input.first_name.trim(),
            input.last_name.trim(),
            number,
            input.construction_days,
        );
        client.object_name = input.object_name.unwrap_or_default().trim().to_string();
        client.phone = input.phone.unwrap_or_default().trim().to_string();
        client.construction_address = input
            .construction_address
            .unwrap_or_default()
            .trim()
            .to_string();
        if let Some(amount) = input.contract_amount {
            client.contract_amount = amount;
        }
        if let Some(stage) = input.stage {
            client.stage = stage;
        }
        if let Some(started_at) = input.started_at {
            client.created_at = Some(started_at);
        }

        client
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        self.storage.record(
            AuditEntry::new(Operation::Create, EntityType::Client, client.id.to_string())
                .labelled(client.display_name())
                .with_after(&client),
        );

        Ok(client)
    }

    /// Get a client by ID
    pub fn get(&self, id: ClientId) -> LedgerResult<Option<Client>> {
        self.storage.clients.get(id)
    }

    /// Find a client by client number, ID, or unique ID prefix
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Client>> {
        if let Some(client) = self.storage.clients.get_by_number(identifier)? {
            return Ok(Some(client));
        }

        if let Ok(id) = identifier.trim().parse::<ClientId>() {
            return self.storage.clients.get(id);
        }

        let mut matches: Vec<_> = self
            .storage
            .clients
            .get_all()?
            .into_iter()
            .filter(|c| c.id.matches_prefix(identifier))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(LedgerError::Validation(format!(
                "'{}' matches {} clients, use a longer ID",
                identifier, n
            ))),
        }
    }

    /// Find a client or fail with NotFound
    pub fn require(&self, identifier: &str) -> LedgerResult<Client> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::client_not_found(identifier))
    }

    /// List clients, optionally only those at one stage
    pub fn list(&self, stage: Option<ClientStage>) -> LedgerResult<Vec<Client>> {
        let mut clients = self.storage.clients.get_all()?;
        if let Some(stage) = stage {
            clients.retain(|c| c.stage == stage);
        }
        Ok(clients)
    }

    /// Flip icon visibility on the client's card, returning the updated client
    pub fn toggle_icons(&self, id: ClientId) -> LedgerResult<Client> {
        self.update(id, |client| {
            let visible = client.toggle_icons();
            format!("icons_visible: {} -> {}", !visible, visible)
        })
    }

    /// Move a client to another stage
    pub fn set_stage(&self, id: ClientId, stage: ClientStage) -> LedgerResult<Client> {
        self.update(id, |client| {
            let from = client.stage;
            client.set_stage(stage);
            format!("stage: {} -> {}", from, stage)
        })
    }

    /// Payments linked to the client, newest first
    pub fn history(&self, id: ClientId) -> LedgerResult<Vec<Transaction>> {
        self.storage.transactions.get_by_client(id)
    }

    /// How much of the client's contract has been paid
    ///
    /// Only income linked to the client counts as payment.
    pub fn payment_progress(&self, client: &Client) -> LedgerResult<PaymentProgress> {
        let paid: Money = self
            .history(client.id)?
            .iter()
            .filter(|t| t.is_income())
            .map(|t| t.amount)
            .sum();

        Ok(PaymentProgress::compute(client.contract_amount, paid))
    }

    fn update<F>(&self, id: ClientId, change: F) -> LedgerResult<Client>
    where
        F: FnOnce(&mut Client) -> String,
    {
        let mut client = self
            .storage
            .clients
            .get(id)?
            .ok_or_else(|| LedgerError::client_not_found(id.to_string()))?;

        let before = client.clone();
        let diff = change(&mut client);

        self.storage.clients.upsert(client.clone())?;
        self.storage.clients.save()?;

        self.storage.record(
            AuditEntry::new(Operation::Update, EntityType::Client, client.id.to_string())
                .labelled(client.display_name())
                .with_before(&before)
                .with_after(&client)
                .with_changes(diff),
        );

        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Category, TransactionType};
    use crate::services::transaction::{CreateTransactionInput, TransactionService};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn input(number: &str) -> CreateClientInput {
        CreateClientInput {
            first_name: "Aidar".into(),
            last_name: "Nurlanov".into(),
            client_number: number.into(),
            construction_days: 90,
            contract_amount: Some(Money::from_units(10_000)),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_client() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ClientService::new(&storage);

        let client = service
            .create(CreateClientInput {
                object_name: Some(" Cottage ".into()),
                ..input("17")
            })
            .unwrap();

        assert_eq!(client.display_name(), "Nurlanov Aidar");
        assert_eq!(client.object_name, "Cottage");
        assert_eq!(client.stage, ClientStage::Building);
        assert!(client.icons_visible);
        assert!(client.created_at.is_some());
        assert_eq!(storage.audit().entry_count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_number_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ClientService::new(&storage);

        service.create(input("17")).unwrap();
        let err = service.create(input(" 17 ")).unwrap_err();
        assert!(matches!(err, LedgerError::Duplicate { .. }));
    }

    #[test]
    fn test_create_validates() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ClientService::new(&storage);

        let err = service
            .create(CreateClientInput {
                first_name: " ".into(),
                last_name: "".into(),
                ..input("17")
            })
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.clients.count().unwrap(), 0);
    }

    #[test]
    fn test_find_and_list() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ClientService::new(&storage);

        let first = service.create(input("17")).unwrap();
        service
            .create(CreateClientInput {
                stage: Some(ClientStage::Built),
                ..input("18")
            })
            .unwrap();

        assert_eq!(service.find("17").unwrap().unwrap().id, first.id);
        assert_eq!(
            service.find(&first.id.to_string()).unwrap().unwrap().id,
            first.id
        );
        assert!(service.require("99").unwrap_err().is_not_found());

        assert_eq!(service.list(None).unwrap().len(), 2);
        assert_eq!(service.list(Some(ClientStage::Built)).unwrap().len(), 1);
        assert_eq!(service.list(Some(ClientStage::Deposit)).unwrap().len(), 0);
    }

    #[test]
    fn test_toggle_icons_and_stage() {
        let (temp_dir, storage) = create_test_storage();
        let service = ClientService::new(&storage);
        let client = service.create(input("17")).unwrap();

        let toggled = service.toggle_icons(client.id).unwrap();
        assert!(!toggled.icons_visible);
        let moved = service.set_stage(client.id, ClientStage::Deposit).unwrap();
        assert_eq!(moved.stage, ClientStage::Deposit);
        assert!(!moved.icons_visible);

        // Survives a reload
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        let loaded = reopened.clients.get(client.id).unwrap().unwrap();
        assert_eq!(loaded.stage, ClientStage::Deposit);
        assert!(!loaded.icons_visible);

        let entries = storage
            .audit()
            .read_for_entity(EntityType::Client, &client.id.to_string())
            .unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[2].changes.as_deref(),
            Some("stage: building -> deposit")
        );
    }

    #[test]
    fn test_toggle_unknown_client() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ClientService::new(&storage);
        assert!(service.toggle_icons(ClientId::new()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_payment_progress_counts_linked_income() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ClientService::new(&storage);
        let client = service.create(input("17")).unwrap();

        let category = Category::new("Cash", "₸");
        let category_id = category.id;
        storage.categories.upsert(category).unwrap();

        let transactions = TransactionService::new(&storage);
        for (kind, units, linked) in [
            (TransactionType::Income, 2_500, true),
            (TransactionType::Income, 1_000, true),
            (TransactionType::Expense, 400, true),
            (TransactionType::Income, 9_000, false),
        ] {
            transactions
                .create(CreateTransactionInput {
                    category_id,
                    kind,
                    amount: Money::from_units(units),
                    date: None,
                    from_user: None,
                    to_user: None,
                    description: None,
                    client_id: linked.then_some(client.id),
                })
                .unwrap();
        }

        assert_eq!(service.history(client.id).unwrap().len(), 3);

        let progress = service.payment_progress(&client).unwrap();
        assert_eq!(progress.paid, Money::from_units(3_500));
        assert_eq!(progress.percent, 35);
        assert_eq!(progress.remaining, Money::from_units(6_500));
    }
}
