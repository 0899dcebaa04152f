use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Prescribed repetitions for one exercise line, e.g. `5x5` or `10`.
///
/// `display` keeps the token exactly as written (minus surrounding
/// whitespace) so read-only views can echo it back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Scheme {
    SetsXReps {
        sets: u32,
        reps: u32,
        display: String,
    },
    RepsOnly {
        reps: u32,
        display: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemeError {
    #[error("missing scheme")]
    Empty,

    #[error("'{0}' is not a valid scheme: expected a number or NxM")]
    NotNumeric(String),

    #[error("'{0}' has more than one 'x' separator")]
    TooManySeparators(String),

    #[error("'{0}' must use counts greater than zero")]
    Zero(String),
}

impl Scheme {
    pub fn parse(token: &str) -> Result<Self, SchemeError> {
        let display = token.trim();
        if display.is_empty() {
            return Err(SchemeError::Empty);
        }

        let parts: Vec<&str> = display.split(['x', 'X']).collect();
        match parts.as_slice() {
            [reps] => Ok(Self::RepsOnly {
                reps: parse_count(reps, display)?,
                display: display.to_string(),
            }),
            [sets, reps] => Ok(Self::SetsXReps {
                sets: parse_count(sets, display)?,
                reps: parse_count(reps, display)?,
                display: display.to_string(),
            }),
            _ => Err(SchemeError::TooManySeparators(display.to_string())),
        }
    }

    pub fn display(&self) -> &str {
        match self {
            Self::SetsXReps { display, .. } | Self::RepsOnly { display, .. } => display,
        }
    }

    /// A reps-only scheme counts as a single set.
    pub fn sets(&self) -> u32 {
        match self {
            Self::SetsXReps { sets, .. } => *sets,
            Self::RepsOnly { .. } => 1,
        }
    }

    pub fn reps(&self) -> u32 {
        match self {
            Self::SetsXReps { reps, .. } | Self::RepsOnly { reps, .. } => *reps,
        }
    }
}

fn parse_count(part: &str, token: &str) -> Result<u32, SchemeError> {
    let part = part.trim();
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(SchemeError::NotNumeric(token.to_string()));
    }

    let value: u32 = part
        .parse()
        .map_err(|_| SchemeError::NotNumeric(token.to_string()))?;

    if value == 0 {
        return Err(SchemeError::Zero(token.to_string()));
    }

    Ok(value)
}
