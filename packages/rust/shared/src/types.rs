//! Core domain types: extracted pairs, parse outcomes, and the chat record
//! shape written to the fine-tuning dataset.

use serde::{Deserialize, Serialize};

use crate::error::{QaExtractError, Result};

/// Instruction placed in the system turn of every record unless overridden.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "تو یک کد ریویور هستی. سوال برنامه‌نویس رو بررسی کن.";

// ---------------------------------------------------------------------------
// QaPair
// ---------------------------------------------------------------------------

/// One extracted question with its answer.
///
/// Both fields are trimmed and guaranteed non-empty; [`QaPair::new`] is the
/// only way to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaPair {
    question: String,
    answer: String,
}

impl QaPair {
    /// Build a pair, trimming both fields. Fails if either is blank.
    pub fn new(question: impl AsRef<str>, answer: impl AsRef<str>) -> Result<Self> {
        let question = question.as_ref().trim();
        let answer = answer.as_ref().trim();

        if question.is_empty() {
            return Err(QaExtractError::validation("question is empty"));
        }
        if answer.is_empty() {
            return Err(QaExtractError::validation("answer is empty"));
        }

        Ok(Self {
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }
}

// ---------------------------------------------------------------------------
// ParseOutcome
// ---------------------------------------------------------------------------

/// Result of parsing one text: pairs in source order plus the number of
/// blocks that were opened but could not produce a pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub pairs: Vec<QaPair>,
    pub invalid_blocks: usize,
}

impl ParseOutcome {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ChatRecord
// ---------------------------------------------------------------------------

/// Speaker of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role/content entry inside a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// A single JSONL line: a fixed three-turn conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub messages: Vec<ChatMessage>,
}

impl ChatRecord {
    /// Wrap a pair as system / user / assistant turns.
    pub fn from_pair(pair: &QaPair, system_prompt: &str) -> Self {
        Self {
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: pair.question.clone(),
                },
                ChatMessage {
                    role: Role::Assistant,
                    content: pair.answer.clone(),
                },
            ],
        }
    }
}

impl TryFrom<ChatRecord> for QaPair {
    type Error = QaExtractError;

    fn try_from(record: ChatRecord) -> Result<Self> {
        let roles: Vec<Role> = record.messages.iter().map(|m| m.role).collect();
        if roles != [Role::System, Role::User, Role::Assistant] {
            return Err(QaExtractError::validation(format!(
                "expected system/user/assistant turns, got {roles:?}"
            )));
        }

        let mut turns = record.messages.into_iter().skip(1);
        match (turns.next(), turns.next()) {
            (Some(user), Some(assistant)) => QaPair::new(user.content, assistant.content),
            _ => Err(QaExtractError::validation("record is missing turns")),
        }
    }
}
