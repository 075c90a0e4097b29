use serde::{Deserialize, Serialize};

use crate::domain::{Color, Outcome, Phase, Position, RoundGeneration, RoundSize, Size, TokenId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenView {
    pub token_id: TokenId,
    pub color: Color,
    pub position: Position,
    pub size: Size,
    pub label_visible: bool,
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum RenderEvent {
    TokenCreated(TokenView),
    TokenMoved {
        token_id: TokenId,
        position: Position,
    },
    LabelToggled {
        token_id: TokenId,
        visible: bool,
    },
    ClickableToggled {
        token_id: TokenId,
        clickable: bool,
    },
    TokenRemoved {
        token_id: TokenId,
    },
    PhaseChanged {
        phase: Phase,
    },
    RoundFinished {
        generation: RoundGeneration,
        outcome: Outcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_size: Option<RoundSize>,
    pub expected_next: TokenId,
    pub tokens: Vec<TokenView>,
}

impl GameSnapshot {
    pub fn token(&self, token_id: TokenId) -> Option<&TokenView> {
        self.tokens.iter().find(|token| token.token_id == token_id)
    }
}
