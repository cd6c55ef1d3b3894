//! Client model
//!
//! A client is a customer whose object is being built. The construction
//! start and its duration in days determine the deadline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::deadline::DeadlineStatus;
use super::ids::ClientId;
use super::money::Money;

/// Where a client is in the construction lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClientStage {
    /// Construction in progress; the only stage with a deadline
    #[default]
    Building,
    /// Deposit paid, construction not started
    Deposit,
    /// Construction finished
    Built,
}

impl ClientStage {
    pub fn all() -> &'static [Self] {
        &[Self::Building, Self::Deposit, Self::Built]
    }
}

impl fmt::Display for ClientStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Building => write!(f, "building"),
            Self::Deposit => write!(f, "deposit"),
            Self::Built => write!(f, "built"),
        }
    }
}

impl FromStr for ClientStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "building" => Ok(Self::Building),
            "deposit" => Ok(Self::Deposit),
            "built" => Ok(Self::Built),
            other => Err(format!(
                "Unknown stage '{}'. Use 'building', 'deposit' or 'built'",
                other
            )),
        }
    }
}

/// Longest construction duration a client may be given (100 years)
pub const MAX_CONSTRUCTION_DAYS: u32 = 36_500;

/// A construction client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,

    pub first_name: String,

    pub last_name: String,

    /// Business-facing client number
    pub client_number: String,

    #[serde(default)]
    pub object_name: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub construction_address: String,

    /// Construction start; evaluated as "now" when missing
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Planned construction duration in days
    pub construction_days: u32,

    /// Whether the card shows its icons
    #[serde(default = "default_icons_visible")]
    pub icons_visible: bool,

    #[serde(default)]
    pub stage: ClientStage,

    /// Total contract value, used for payment progress
    #[serde(default)]
    pub contract_amount: Money,

    pub updated_at: DateTime<Utc>,
}

fn default_icons_visible() -> bool {
    true
}

impl Client {
    /// Create a new client starting construction now
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        client_number: impl Into<String>,
        construction_days: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ClientId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            client_number: client_number.into(),
            object_name: String::new(),
            phone: String::new(),
            construction_address: String::new(),
            created_at: Some(now),
            construction_days,
            icons_visible: true,
            stage: ClientStage::Building,
            contract_amount: Money::zero(),
            updated_at: now,
        }
    }

    /// "Last First", the way cards show it
    pub fn display_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
            .trim()
            .to_string()
    }

    /// Construction start, falling back to `now` when none is stored
    pub fn construction_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.created_at.unwrap_or(now)
    }

    /// Deadline state; `None` unless the client is in the building stage
    pub fn deadline_status(&self, now: DateTime<Utc>, near_days: i64) -> Option<DeadlineStatus> {
        if self.stage != ClientStage::Building {
            return None;
        }

        Some(DeadlineStatus::evaluate_with_threshold(
            now,
            self.construction_start(now),
            i64::from(self.construction_days),
            near_days,
        ))
    }

    /// Flip icon visibility, returning the new value
    pub fn toggle_icons(&mut self) -> bool {
        self.icons_visible = !self.icons_visible;
        self.updated_at = Utc::now();
        self.icons_visible
    }

    pub fn set_stage(&mut self, stage: ClientStage) {
        self.stage = stage;
        self.updated_at = Utc::now();
    }

    /// Validate the client
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.first_name.trim().is_empty() && self.last_name.trim().is_empty() {
            return Err(ClientValidationError::EmptyName);
        }

        if self.client_number.trim().is_empty() {
            return Err(ClientValidationError::EmptyNumber);
        }

        if self.contract_amount.is_negative() {
            return Err(ClientValidationError::NegativeContract);
        }

        if self.construction_days > MAX_CONSTRUCTION_DAYS {
            return Err(ClientValidationError::DurationTooLong(
                self.construction_days,
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.client_number)
    }
}

/// Validation errors for clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    EmptyName,
    EmptyNumber,
    NegativeContract,
    DurationTooLong(u32),
}

impl fmt::Display for ClientValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Client needs a first or last name"),
            Self::EmptyNumber => write!(f, "Client number cannot be empty"),
            Self::NegativeContract => write!(f, "Contract amount cannot be negative"),
            Self::DurationTooLong(days) => write!(
                f,
                "Construction duration too long ({} days, max {})",
                days, MAX_CONSTRUCTION_DAYS
            ),
        }
    }
}

impl std::error::Error for ClientValidationError {}
