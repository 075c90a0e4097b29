use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TokenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidRoundSize,
    ReentrantStart,
    SequenceMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("round size must be a whole number between 3 and 7, got '{input}'")]
    InvalidRoundSize { input: String },
    #[error("round is scrambling; start request ignored")]
    ReentrantStart,
    #[error("expected token {expected}, clicked token {clicked}")]
    SequenceMismatch { expected: TokenId, clicked: TokenId },
}

impl GameError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidRoundSize { .. } => ErrorCode::InvalidRoundSize,
            Self::ReentrantStart => ErrorCode::ReentrantStart,
            Self::SequenceMismatch { .. } => ErrorCode::SequenceMismatch,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorNotice {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorNotice {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<&GameError> for ErrorNotice {
    fn from(value: &GameError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}
