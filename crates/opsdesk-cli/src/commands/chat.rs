//! Interactive tabbed chat mode.
//!
//! A thin terminal rendition of the inbox presentation layer: the numbered
//! inbox list opens tabs, the tab strip shows the open set, and the
//! composer sends into the active tab. Keyboard chords (close / close-all /
//! next / prev) go through the shortcut dispatcher and are suppressed
//! while the composer has focus.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, read};
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute};
use tokio::sync::broadcast;

use opsdesk_core::chat::{ChatSessionEvent, OpenChatManager};
use opsdesk_core::conversation::{Conversation, ConversationFilter, DeliveryStatus, Direction};
use opsdesk_core::inbox::{InboxDataSource, send_into_open_chat};
use opsdesk_core::keyboard::{FocusTarget, ShortcutDispatcher, ShortcutListener};

const VISIBLE_MESSAGES: usize = 10;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Focus {
    TabStrip,
    Composer,
}

pub async fn run(source: Arc<dyn InboxDataSource>) -> Result<()> {
    let page = source
        .list_conversations(&ConversationFilter::default())
        .await?;
    if page.conversations.is_empty() {
        println!("inbox is empty");
        return Ok(());
    }

    let _listener = ShortcutListener::install()?;

    enable_raw_mode()?;
    let result = event_loop(source, page.conversations).await;
    disable_raw_mode()?;
    execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    result
}

async fn event_loop(
    source: Arc<dyn InboxDataSource>,
    inbox: Vec<Conversation>,
) -> Result<()> {
    let mut manager = OpenChatManager::new();
    let mut session_events = manager.subscribe();

    let mut focus = Focus::TabStrip;
    let mut composer = String::new();
    let mut status = "digits open a conversation, Enter focuses the composer, q quits".to_string();

    loop {
        draw(&manager, &inbox, focus, &composer, &status)?;

        let Event::Key(key) = read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let focus_target = match focus {
            Focus::Composer => FocusTarget::TextEntry,
            Focus::TabStrip => FocusTarget::Elsewhere,
        };

        if ShortcutDispatcher::dispatch(&key, focus_target, &mut manager).is_none() {
            match focus {
                Focus::Composer => {
                    handle_composer_key(
                        &key,
                        &mut focus,
                        &mut composer,
                        &mut status,
                        source.as_ref(),
                        &mut manager,
                    )
                    .await?;
                }
                Focus::TabStrip => {
                    if handle_strip_key(
                        &key,
                        &mut focus,
                        &mut status,
                        source.as_ref(),
                        &inbox,
                        &mut manager,
                    )
                    .await?
                    {
                        break;
                    }
                }
            }
        }

        drain_events(&mut session_events, &mut status);
    }

    Ok(())
}

async fn handle_composer_key(
    key: &KeyEvent,
    focus: &mut Focus,
    composer: &mut String,
    status: &mut String,
    source: &dyn InboxDataSource,
    manager: &mut OpenChatManager,
) -> Result<()> {
    match key.code {
        KeyCode::Esc => *focus = Focus::TabStrip,
        KeyCode::Enter => {
            let Some(active_id) = manager.active_id().map(str::to_owned) else {
                *focus = Focus::TabStrip;
                return Ok(());
            };
            if composer.trim().is_empty() {
                return Ok(());
            }
            match send_into_open_chat(source, manager, &active_id, composer, Vec::new()).await {
                Ok(_) => composer.clear(),
                Err(err) => *status = format!("send failed: {err}"),
            }
        }
        KeyCode::Backspace => {
            composer.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            composer.push(c);
        }
        _ => {}
    }
    Ok(())
}

async fn handle_strip_key(
    key: &KeyEvent,
    focus: &mut Focus,
    status: &mut String,
    source: &dyn InboxDataSource,
    inbox: &[Conversation],
    manager: &mut OpenChatManager,
) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Enter | KeyCode::Char('i') => {
            if manager.active_chat().is_some() {
                *focus = Focus::Composer;
            }
        }
        KeyCode::Char(digit @ '1'..='9') => {
            let index = digit as usize - '1' as usize;
            if let Some(conversation) = inbox.get(index) {
                match source.get_conversation(&conversation.id).await {
                    Ok(detail) => manager.open_chat(detail.conversation, detail.messages),
                    Err(err) => *status = format!("open failed: {err}"),
                }
            }
        }
        KeyCode::Right => {
            if let Some(target) = manager.cycle_target(1).map(str::to_owned) {
                manager.switch_to_chat(&target);
            }
        }
        KeyCode::Left => {
            if let Some(target) = manager.cycle_target(-1).map(str::to_owned) {
                manager.switch_to_chat(&target);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn drain_events(events: &mut broadcast::Receiver<ChatSessionEvent>, status: &mut String) {
    while let Ok(event) = events.try_recv() {
        *status = describe(&event);
    }
}

fn describe(event: &ChatSessionEvent) -> String {
    match event {
        ChatSessionEvent::Opened { conversation_id } => format!("opened {conversation_id}"),
        ChatSessionEvent::Closed { conversation_id } => format!("closed {conversation_id}"),
        ChatSessionEvent::ActiveChanged {
            conversation_id: Some(id),
        } => format!("active: {id}"),
        ChatSessionEvent::ActiveChanged {
            conversation_id: None,
        } => "no active tab".to_string(),
        ChatSessionEvent::MessagesUpdated { conversation_id } => {
            format!("updated {conversation_id}")
        }
        ChatSessionEvent::ClosedAll => "closed all tabs".to_string(),
    }
}

fn draw(
    manager: &OpenChatManager,
    inbox: &[Conversation],
    focus: Focus,
    composer: &str,
    status: &str,
) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    let mut out = String::new();

    out.push_str(&format!("{}\r\n", "inbox".bold()));
    for (index, conversation) in inbox.iter().enumerate().take(9) {
        out.push_str(&format!(
            "  {} {} [{}]\r\n",
            index + 1,
            conversation.title(),
            conversation.platform
        ));
    }
    out.push_str("\r\n");

    let snapshot = manager.snapshot();
    let strip: Vec<String> = snapshot
        .tabs
        .iter()
        .map(|tab| {
            if Some(tab.conversation_id.as_str()) == snapshot.active_id.as_deref() {
                format!("[{}]", tab.title.bold().reversed())
            } else {
                format!("[{}]", tab.title)
            }
        })
        .collect();
    out.push_str(&format!("tabs: {}\r\n\r\n", strip.join(" ")));

    if let Some(chat) = manager.active_chat() {
        let skip = chat.messages.len().saturating_sub(VISIBLE_MESSAGES);
        for message in chat.messages.iter().skip(skip) {
            let prefix = match message.direction {
                Direction::Inbound => "<-".cyan(),
                Direction::Outbound => "->".green(),
            };
            let failed = if message.status == DeliveryStatus::Failed {
                " [failed]".red().bold().to_string()
            } else {
                String::new()
            };
            out.push_str(&format!("{} {}{}\r\n", prefix, message.content, failed));
        }
    } else {
        out.push_str("no open chat\r\n");
    }

    out.push_str(&format!("\r\n{}\r\n", status.dimmed()));
    let marker = if focus == Focus::Composer { ">" } else { " " };
    out.push_str(&format!("{marker} {composer}"));

    stdout.write_all(out.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
