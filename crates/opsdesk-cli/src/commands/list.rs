use anyhow::Result;
use colored::Colorize;

use opsdesk_core::conversation::{Conversation, ConversationFilter, Platform};
use opsdesk_core::inbox::InboxDataSource;

pub async fn run(source: &dyn InboxDataSource, filter: &ConversationFilter) -> Result<()> {
    let page = source.list_conversations(filter).await?;

    println!(
        "{} conversations, {} unread in inbox",
        page.total,
        page.unread_total.to_string().bold()
    );

    for conversation in &page.conversations {
        println!("{}", row(conversation));
    }

    Ok(())
}

fn row(conversation: &Conversation) -> String {
    let unread = if conversation.unread_count > 0 {
        format!(" ({})", conversation.unread_count).bold().to_string()
    } else {
        String::new()
    };
    let preview = conversation.last_message_preview.as_deref().unwrap_or("");

    format!(
        "{:12} {}{}  {}  {}",
        platform_tag(conversation.platform),
        conversation.title(),
        unread,
        conversation.id.dimmed(),
        preview.dimmed()
    )
}

fn platform_tag(platform: Platform) -> colored::ColoredString {
    let tag = platform.to_string();
    match platform {
        Platform::Telegram => tag.blue(),
        Platform::Whatsapp => tag.green(),
        Platform::Email => tag.yellow(),
        Platform::Facebook => tag.cyan(),
        Platform::Instagram => tag.magenta(),
    }
}
