use std::collections::BTreeMap;

use async_trait::async_trait;
use game_core::StartDisposition;
use host_integration::OutcomeNotifier;
use shared::{
    domain::{Outcome, Phase, Size, TokenId},
    messages::Messages,
    protocol::{RenderEvent, TokenView},
};
use tracing::{debug, info};

const BOARD_COLS: u32 = 48;
const BOARD_ROWS: u32 = 16;
const HIDDEN_LABEL: char = '#';
const EMPTY_CELL: char = '.';

pub struct TextRenderer {
    container: Size,
    json: bool,
    phase: Phase,
    tokens: BTreeMap<TokenId, TokenView>,
}

impl TextRenderer {
    pub fn new(container: Size, json: bool) -> Self {
        Self {
            container,
            json,
            phase: Phase::Idle,
            tokens: BTreeMap::new(),
        }
    }

    pub fn apply(&mut self, event: &RenderEvent) -> Result<Option<String>, serde_json::Error> {
        self.track(event);
        if self.json {
            return serde_json::to_string(event).map(Some);
        }

        let text = match event {
            RenderEvent::PhaseChanged { phase } => match phase {
                Phase::Waiting => Some(format!("Memorize the order!\n{}", self.board())),
                Phase::Scrambling { completed } => {
                    Some(format!("Scramble {completed}\n{}", self.board()))
                }
                Phase::Testing => Some(format!(
                    "Click the tokens in order (type a number).\n{}",
                    self.board()
                )),
                Phase::Won | Phase::Failed => Some(self.board()),
                Phase::Idle | Phase::Populating => None,
            },
            RenderEvent::LabelToggled {
                token_id,
                visible: true,
            } if self.phase == Phase::Testing => Some(format!("Token {token_id} matched.")),
            _ => None,
        };
        Ok(text)
    }

    pub fn board(&self) -> String {
        let mut cells = vec![vec![EMPTY_CELL; BOARD_COLS as usize]; BOARD_ROWS as usize];
        for token in self.tokens.values() {
            let col = scale(token.position.x, self.container.width, BOARD_COLS);
            let row = scale(token.position.y, self.container.height, BOARD_ROWS);
            cells[row as usize][col as usize] = label(token);
        }

        let border = format!("+{}+", "-".repeat(BOARD_COLS as usize));
        let mut out = String::with_capacity(((BOARD_COLS + 3) * (BOARD_ROWS + 2)) as usize);
        out.push_str(&border);
        for row in cells {
            out.push('\n');
            out.push('|');
            out.extend(row);
            out.push('|');
        }
        out.push('\n');
        out.push_str(&border);
        out
    }

    fn track(&mut self, event: &RenderEvent) {
        match event {
            RenderEvent::TokenCreated(view) => {
                self.tokens.insert(view.token_id, view.clone());
            }
            RenderEvent::TokenMoved { token_id, position } => {
                if let Some(token) = self.tokens.get_mut(token_id) {
                    token.position = *position;
                }
            }
            RenderEvent::LabelToggled { token_id, visible } => {
                if let Some(token) = self.tokens.get_mut(token_id) {
                    token.label_visible = *visible;
                }
            }
            RenderEvent::ClickableToggled {
                token_id,
                clickable,
            } => {
                if let Some(token) = self.tokens.get_mut(token_id) {
                    token.clickable = *clickable;
                }
            }
            RenderEvent::TokenRemoved { token_id } => {
                self.tokens.remove(token_id);
            }
            RenderEvent::PhaseChanged { phase } => self.phase = *phase,
            RenderEvent::RoundFinished { .. } => {}
        }
    }
}

fn scale(value: u32, extent: u32, cells: u32) -> u32 {
    let scaled = u64::from(value) * u64::from(cells) / u64::from(extent.max(1));
    (scaled as u32).min(cells - 1)
}

fn label(token: &TokenView) -> char {
    if token.label_visible {
        char::from_digit(token.token_id.0, 10).unwrap_or('*')
    } else {
        HIDDEN_LABEL
    }
}

/// Text to show after a start request. A start refused mid-scramble shows nothing.
pub fn start_feedback(disposition: StartDisposition, messages: &Messages) -> Option<String> {
    match disposition {
        StartDisposition::Started { generation } => {
            debug!(generation = generation.0, "terminal: round started");
            Some(messages.go.clone())
        }
        StartDisposition::Ignored => {
            debug!("terminal: start ignored while scrambling");
            None
        }
    }
}

pub struct ConsoleNotifier;

#[async_trait]
impl OutcomeNotifier for ConsoleNotifier {
    async fn notify(&self, outcome: Outcome, message: &str) {
        println!("\n*** {message} ***");
        println!("Type `new` to play another round, or `quit` to exit.");
        info!(?outcome, "round: outcome shown");
    }
}
