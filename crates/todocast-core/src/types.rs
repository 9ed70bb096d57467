//! Domain types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A row of the `todos` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: i64,
    pub item: String,
    pub done: bool,
}

/// A change to the todo list, rendered as the text published on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoEvent {
    Created(String),
    Completed(String),
}

impl fmt::Display for TodoEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoEvent::Created(text) => write!(f, "New todo created: {text}"),
            TodoEvent::Completed(text) => write!(f, "Todo completed: {text}"),
        }
    }
}

/// A message received from the notification bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub subject: String,
    pub payload: Vec<u8>,
}

impl InboundMessage {
    pub fn new(subject: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            subject: subject.into(),
            payload: payload.into(),
        }
    }
}
