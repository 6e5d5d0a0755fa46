use anyhow::Result;
use colored::Colorize;

use opsdesk_core::conversation::{DeliveryStatus, Direction, Message};
use opsdesk_core::inbox::InboxDataSource;

pub async fn run(source: &dyn InboxDataSource, conversation_id: &str) -> Result<()> {
    let detail = source.get_conversation(conversation_id).await?;

    let conversation = &detail.conversation;
    println!(
        "{} [{}] {}",
        conversation.title().bold(),
        conversation.platform,
        conversation.address.dimmed()
    );
    if let Some(subject) = &conversation.subject {
        println!("subject: {subject}");
    }

    for message in &detail.messages {
        println!("{}", line(message));
    }

    Ok(())
}

fn line(message: &Message) -> String {
    let prefix = match message.direction {
        Direction::Inbound => "<-".cyan(),
        Direction::Outbound => "->".green(),
    };
    let status = match message.status {
        // Failure must be visibly different from a delivered message.
        DeliveryStatus::Failed => " [failed]".red().bold().to_string(),
        DeliveryStatus::Queued => " [queued]".dimmed().to_string(),
        DeliveryStatus::Sent | DeliveryStatus::Read => String::new(),
    };
    let attachments = if message.attachments.is_empty() {
        String::new()
    } else {
        format!(" (+{} attachment(s))", message.attachments.len())
    };

    format!(
        "{} {}{}{}  {}",
        prefix,
        message.content,
        attachments,
        status,
        message.created_at.dimmed()
    )
}
