//! Client card formatting
//!
//! A client card is the one-row summary of a client: stage, name, object,
//! contacts, deadline alert and payment progress. [`ClientCard::build`]
//! derives everything from the stored client; the format functions only lay
//! it out.

use chrono::{DateTime, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Client, ClientStage, DeadlineStatus, PaymentProgress};

/// Colour a card is accented with, by stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageAccent {
    Emerald,
    Amber,
    Blue,
}

impl StageAccent {
    pub fn for_stage(stage: ClientStage) -> Self {
        match stage {
            ClientStage::Building => Self::Emerald,
            ClientStage::Deposit => Self::Amber,
            ClientStage::Built => Self::Blue,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Emerald => "emerald",
            Self::Amber => "amber",
            Self::Blue => "blue",
        }
    }
}

/// Icon shown for a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageIcon {
    Building,
    Money,
    Calendar,
}

impl StageIcon {
    pub fn for_stage(stage: ClientStage) -> Self {
        match stage {
            ClientStage::Building => Self::Building,
            ClientStage::Deposit => Self::Money,
            ClientStage::Built => Self::Calendar,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Building => "🏗",
            Self::Money => "$",
            Self::Calendar => "📅",
        }
    }
}

/// The icon-visibility toggle on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityIcon {
    Eye,
    EyeOff,
}

impl VisibilityIcon {
    pub fn for_visibility(visible: bool) -> Self {
        if visible {
            Self::Eye
        } else {
            Self::EyeOff
        }
    }

    /// What pressing the toggle would do
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Eye => "Hide icons",
            Self::EyeOff => "Show icons",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Eye => "👁",
            Self::EyeOff => "-",
        }
    }
}

/// Everything a client card shows
#[derive(Debug, Clone)]
pub struct ClientCard {
    pub row_number: String,
    pub client_number: String,
    pub display_name: String,
    /// Object name, or an em dash when the client has none
    pub object_name: String,
    pub phone: String,
    pub address: String,
    pub stage: ClientStage,
    pub accent: StageAccent,
    pub stage_icon: StageIcon,
    pub icons_visible: bool,
    pub visibility: VisibilityIcon,
    /// `None` unless the client is building
    pub deadline: Option<DeadlineStatus>,
    /// Deadline near or passed
    pub alert: bool,
    pub progress: PaymentProgress,
}

impl ClientCard {
    pub fn build(
        client: &Client,
        row_number: impl Into<String>,
        now: DateTime<Utc>,
        progress: PaymentProgress,
        near_days: i64,
    ) -> Self {
        let deadline = client.deadline_status(now, near_days);
        let object_name = if client.object_name.trim().is_empty() {
            "—".to_string()
        } else {
            client.object_name.clone()
        };

        Self {
            row_number: row_number.into(),
            client_number: client.client_number.clone(),
            display_name: client.display_name(),
            object_name,
            phone: client.phone.clone(),
            address: client.construction_address.clone(),
            stage: client.stage,
            accent: StageAccent::for_stage(client.stage),
            stage_icon: StageIcon::for_stage(client.stage),
            icons_visible: client.icons_visible,
            visibility: VisibilityIcon::for_visibility(client.icons_visible),
            alert: deadline.is_some_and(|d| d.needs_attention()),
            deadline,
            progress,
        }
    }

    /// Deadline state in words, empty when there is nothing to say
    pub fn deadline_note(&self) -> String {
        match self.deadline {
            Some(d) if d.passed && d.days_left == 0 => "deadline passed today".to_string(),
            Some(d) if d.passed => format!("overdue by {} d", -d.days_left),
            Some(d) if d.near => format!("{} d left", d.days_left),
            _ => String::new(),
        }
    }
}

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "#")]
    row: String,
    #[tabled(rename = "")]
    icon: String,
    #[tabled(rename = "Client")]
    name: String,
    #[tabled(rename = "No.")]
    number: String,
    #[tabled(rename = "Object")]
    object: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
    #[tabled(rename = "")]
    visibility: String,
}

impl From<&ClientCard> for ClientRow {
    fn from(card: &ClientCard) -> Self {
        let name = if card.alert {
            format!("! {}", card.display_name)
        } else {
            card.display_name.clone()
        };
        let icon = if card.icons_visible {
            card.stage_icon.glyph().to_string()
        } else {
            String::new()
        };

        Self {
            row: card.row_number.clone(),
            icon,
            name,
            number: card.client_number.clone(),
            object: card.object_name.clone(),
            phone: card.phone.clone(),
            address: card.address.clone(),
            paid: format!("{}%", card.progress.percent),
            deadline: card.deadline_note(),
            visibility: card.visibility.glyph().to_string(),
        }
    }
}

/// Format client cards as a table; alert rows are marked with `!`
pub fn format_client_table(cards: &[ClientCard]) -> String {
    if cards.is_empty() {
        return "No clients found.".to_string();
    }

    let rows: Vec<ClientRow> = cards.iter().map(ClientRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Format one client card with its deadline and payment details
pub fn format_client_details(
    card: &ClientCard,
    date_format: &str,
    currency: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Client:   {} ({})\n", card.display_name, card.client_number));
    output.push_str(&format!(
        "Stage:    {} {} [{}]\n",
        card.stage_icon.glyph(),
        card.stage,
        card.accent.name()
    ));
    output.push_str(&format!("Object:   {}\n", card.object_name));
    if !card.phone.is_empty() {
        output.push_str(&format!("Phone:    {}\n", card.phone));
    }
    if !card.address.is_empty() {
        output.push_str(&format!("Address:  {}\n", card.address));
    }

    if let Some(deadline) = card.deadline {
        output.push_str(&format!(
            "Deadline: {} ({} days left)\n",
            deadline.deadline.format(date_format),
            deadline.days_left
        ));
        if deadline.passed {
            output.push_str("          ! deadline passed\n");
        } else if deadline.near {
            output.push_str("          ! deadline near\n");
        }
    }

    output.push_str(&format!(
        "Paid:     {} ({}%), remaining {}\n",
        card.progress.paid.format_with_suffix(currency),
        card.progress.percent,
        card.progress.remaining.format_with_suffix(currency)
    ));
    output.push_str(&format!(
        "Icons:    {} ({})\n",
        card.visibility.glyph(),
        card.visibility.hint()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::Duration;

    fn progress() -> PaymentProgress {
        PaymentProgress::compute(Money::from_units(1000), Money::from_units(250))
    }

    fn client(stage: ClientStage, started_days_ago: i64, days: u32) -> (Client, DateTime<Utc>) {
        let now = Utc::now();
        let mut client = Client::new("Aidar", "Nurlanov", "17", days);
        client.created_at = Some(now - Duration::days(started_days_ago));
        client.stage = stage;
        (client, now)
    }

    #[test]
    fn test_stage_visuals() {
        assert_eq!(StageAccent::for_stage(ClientStage::Building), StageAccent::Emerald);
        assert_eq!(StageAccent::for_stage(ClientStage::Deposit), StageAccent::Amber);
        assert_eq!(StageAccent::for_stage(ClientStage::Built), StageAccent::Blue);
        assert_eq!(StageIcon::for_stage(ClientStage::Deposit), StageIcon::Money);
        assert_eq!(StageIcon::for_stage(ClientStage::Built), StageIcon::Calendar);
    }

    #[test]
    fn test_card_for_fresh_building_client() {
        let (client, now) = client(ClientStage::Building, 0, 90);
        let card = ClientCard::build(&client, "1", now, progress(), 5);

        assert_eq!(card.display_name, "Nurlanov Aidar");
        assert_eq!(card.object_name, "—");
        assert_eq!(card.accent, StageAccent::Emerald);
        assert!(!card.alert);
        assert_eq!(card.deadline.unwrap().days_left, 90);
        assert_eq!(card.visibility.hint(), "Hide icons");
    }

    #[test]
    fn test_card_alerts_near_and_passed() {
        let (near, now) = client(ClientStage::Building, 87, 90);
        let card = ClientCard::build(&near, "1", now, progress(), 5);
        assert!(card.alert);
        assert_eq!(card.deadline_note(), "3 d left");

        let (late, now) = client(ClientStage::Building, 100, 90);
        let card = ClientCard::build(&late, "2", now, progress(), 5);
        assert!(card.alert);
        assert!(card.deadline.unwrap().passed);
        assert_eq!(card.deadline_note(), "overdue by 10 d");
    }

    #[test]
    fn test_note_on_the_day_the_deadline_passes() {
        let (client, start) = client(ClientStage::Building, 0, 90);
        let now = start + Duration::days(90) + Duration::hours(2);
        let card = ClientCard::build(&client, "1", now, progress(), 5);

        assert!(card.alert);
        assert_eq!(card.deadline_note(), "deadline passed today");
    }

    #[test]
    fn test_only_building_stage_alerts() {
        let (client, now) = client(ClientStage::Built, 100, 90);
        let card = ClientCard::build(&client, "1", now, progress(), 5);
        assert!(!card.alert);
        assert!(card.deadline.is_none());
        assert_eq!(card.deadline_note(), "");
    }

    #[test]
    fn test_hidden_icons() {
        let (mut client, now) = client(ClientStage::Deposit, 0, 30);
        client.toggle_icons();
        let card = ClientCard::build(&client, "4", now, progress(), 5);

        assert_eq!(card.visibility, VisibilityIcon::EyeOff);
        assert_eq!(card.visibility.hint(), "Show icons");

        let table = format_client_table(&[card]);
        assert!(!table.contains(StageIcon::Money.glyph()));
    }

    #[test]
    fn test_table_marks_alert_rows() {
        let (late, now) = client(ClientStage::Building, 100, 90);
        let (ok, _) = client(ClientStage::Building, 0, 90);
        let cards = vec![
            ClientCard::build(&late, "1", now, progress(), 5),
            ClientCard::build(&ok, "2", now, progress(), 5),
        ];

        let table = format_client_table(&cards);
        assert!(table.contains("! Nurlanov Aidar"));
        assert!(table.contains("25%"));
        assert_eq!(table.matches("! Nurlanov").count(), 1);
    }

    #[test]
    fn test_details() {
        let (client, now) = client(ClientStage::Building, 100, 90);
        let card = ClientCard::build(&client, "1", now, progress(), 5);
        let details = format_client_details(&card, "%d.%m.%Y", "₸");

        assert!(details.contains("deadline passed"));
        assert!(details.contains("250 ₸ (25%), remaining 750 ₸"));
        assert!(details.contains("Hide icons"));
    }
}
