//! Conversation domain module.
//!
//! This module contains the domain models for external conversation threads
//! and their messages.
//!
//! # Module Structure
//!
//! - `model`: Conversation entity, platform tags and list filters
//! - `message`: Message entity, direction, content type and delivery status

mod message;
mod model;

// Re-export public API
pub use message::{Attachment, ContentType, DeliveryStatus, Direction, Message};
pub use model::{Conversation, ConversationFilter, Platform, StatusFilter};
