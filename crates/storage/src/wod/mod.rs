//! Workout-of-the-day notation.
//!
//! ```text
//! # Strength
//! [Back Squat]: 5x5
//! [Push-ups]: 20
//! Rest as needed
//! ```
//!
//! `# Name` opens a block, `[Exercise]: scheme` adds a prescription, and any
//! other non-blank line is kept as free text. A bad scheme is recorded on its
//! line and parsing carries on.

mod scheme;
mod tokenizer;

pub use scheme::{Scheme, SchemeError};
pub use tokenizer::{WodLine, tokenize};

use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParsedWod {
    pub blocks: Vec<WodBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WodBlock {
    /// `None` for lines that appear before the first header
    pub name: Option<String>,
    pub line: Option<usize>,
    pub items: Vec<WodItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WodItem {
    Exercise {
        line: usize,
        name: String,
        scheme: Option<Scheme>,
        error: Option<String>,
    },
    Text {
        line: usize,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WodLineError {
    pub line: usize,
    pub message: String,
}

impl WodBlock {
    fn named(name: String, line: usize) -> Self {
        Self {
            name: Some(name),
            line: Some(line),
            items: Vec::new(),
        }
    }

    fn unnamed() -> Self {
        Self {
            name: None,
            line: None,
            items: Vec::new(),
        }
    }
}

impl ParsedWod {
    pub fn errors(&self) -> Vec<WodLineError> {
        self.items()
            .filter_map(|item| match item {
                WodItem::Exercise {
                    line,
                    error: Some(message),
                    ..
                } => Some(WodLineError {
                    line: *line,
                    message: message.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    /// Distinct exercise names in order of first appearance.
    pub fn exercise_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for item in self.items() {
            if let WodItem::Exercise { name, .. } = item {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn items(&self) -> impl Iterator<Item = &WodItem> {
        self.blocks.iter().flat_map(|block| block.items.iter())
    }
}

pub fn parse_wod(text: &str) -> ParsedWod {
    let mut blocks: Vec<WodBlock> = Vec::new();

    for token in tokenize(text) {
        let item = match token {
            WodLine::BlockHeader { line, name } => {
                blocks.push(WodBlock::named(name, line));
                continue;
            }
            WodLine::Exercise { line, name, scheme } => match Scheme::parse(&scheme) {
                Ok(scheme) => WodItem::Exercise {
                    line,
                    name,
                    scheme: Some(scheme),
                    error: None,
                },
                Err(e) => {
                    debug!("Line {}: invalid scheme for '{}': {}", line, name, e);
                    WodItem::Exercise {
                        line,
                        name,
                        scheme: None,
                        error: Some(e.to_string()),
                    }
                }
            },
            WodLine::FreeText { line, text } => WodItem::Text { line, text },
        };

        if blocks.is_empty() {
            blocks.push(WodBlock::unnamed());
        }
        let last = blocks.len() - 1;
        blocks[last].items.push(item);
    }

    ParsedWod { blocks }
}
