//! Quick Action domain models.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// A named side-effecting operation triggerable from a conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuickAction {
    /// Create a client record from the conversation's contact.
    CreateClient,
    /// Create an order draft linked to the conversation's client.
    CreateOrder,
    /// Move the conversation out of the working set.
    ArchiveConversation,
}

/// Result of a quick action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickActionOutcome {
    /// The action that ran.
    pub action: QuickAction,
    /// Identifier of the entity the action created, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    /// Human-readable result detail for toasts and logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_action_round_trips_through_serde() {
        let json = serde_json::to_string(&QuickAction::CreateOrder).unwrap();
        assert_eq!(json, "\"create_order\"");
        let back: QuickAction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QuickAction::CreateOrder);
    }

    #[test]
    fn test_action_parses_from_cli_string() {
        assert_eq!(
            QuickAction::from_str("create_client").unwrap(),
            QuickAction::CreateClient
        );
        assert!(QuickAction::from_str("explode").is_err());
    }
}
