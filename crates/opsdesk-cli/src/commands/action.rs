use anyhow::Result;
use colored::Colorize;

use opsdesk_core::inbox::InboxDataSource;
use opsdesk_core::quick_action::QuickAction;

pub async fn run(
    source: &dyn InboxDataSource,
    conversation_id: &str,
    action: QuickAction,
) -> Result<()> {
    let outcome = source.quick_action(conversation_id, action, None).await?;

    println!("{} {}", "ok".green().bold(), outcome.action);
    if let Some(entity_id) = &outcome.entity_id {
        println!("entity: {entity_id}");
    }
    if let Some(detail) = &outcome.detail {
        println!("{detail}");
    }

    Ok(())
}
