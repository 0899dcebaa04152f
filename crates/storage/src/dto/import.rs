use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Raw TSV body, one record per line
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ImportRequest {
    #[validate(length(min = 1, message = "TSV data cannot be empty"))]
    pub data: String,
}

/// Outcome counts of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImportSummary {
    pub entity: String,
    pub imported: usize,
    pub updated: usize,
    pub skipped: usize,
    /// Raw text of every row that could not be parsed
    pub invalid_rows: Vec<String>,
}

impl ImportSummary {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            ..Self::default()
        }
    }

    pub fn has_changes(&self) -> bool {
        self.imported > 0 || self.updated > 0
    }

    pub fn message(&self) -> String {
        let mut message = if self.has_changes() {
            let mut parts = vec![format!("Imported {} {}", self.imported, self.entity)];
            if self.updated > 0 {
                parts.push(format!("updated {}", self.updated));
            }
            if self.skipped > 0 {
                parts.push(format!("skipped {} duplicates", self.skipped));
            }
            format!("{}.", parts.join(", "))
        } else {
            "No new data imported.".to_string()
        };

        if !self.invalid_rows.is_empty() {
            let quoted: Vec<String> = self
                .invalid_rows
                .iter()
                .map(|row| format!("\"{}\"", row))
                .collect();
            message.push_str(&format!(
                " {} invalid rows: {}",
                self.invalid_rows.len(),
                quoted.join(", ")
            ));
        }

        message
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImportResponse {
    pub message: String,
    pub summary: ImportSummary,
}

impl From<ImportSummary> for ImportResponse {
    fn from(summary: ImportSummary) -> Self {
        Self {
            message: summary.message(),
            summary,
        }
    }
}
