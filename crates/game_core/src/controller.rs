use host_integration::{Container, RandomSource};
use shared::{
    domain::{Phase, RoundSize, Size, TokenId},
    error::GameError,
    protocol::{GameSnapshot, RenderEvent},
};
use tracing::{debug, info, warn};

use crate::{
    placement::{flow_layout, random_position},
    token::Token,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Matched {
        token_id: TokenId,
        remaining: u32,
    },
    Won,
    Failed(GameError),
}

/// Round state machine. Synchronous and free of timers; [`crate::GameSession`] drives the
/// timed transitions. Every visible change is queued as a [`RenderEvent`].
pub struct GameController {
    container: Box<dyn Container>,
    rng: Box<dyn RandomSource>,
    tokens: Vec<Token>,
    expected_next: TokenId,
    phase: Phase,
    round_size: Option<RoundSize>,
    pending: Vec<RenderEvent>,
}

impl GameController {
    pub fn new(
        container: impl Container + 'static,
        rng: impl RandomSource + 'static,
    ) -> Self {
        Self {
            container: Box::new(container),
            rng: Box::new(rng),
            tokens: Vec::new(),
            expected_next: TokenId(1),
            phase: Phase::Idle,
            round_size: None,
            pending: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round_size(&self) -> Option<RoundSize> {
        self.round_size
    }

    pub fn expected_next(&self) -> TokenId {
        self.expected_next
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn start(&mut self, size: RoundSize) -> Result<(), GameError> {
        if self.phase.is_scrambling() {
            debug!(round_size = size.get(), "round: start rejected while scrambling");
            return Err(GameError::ReentrantStart);
        }

        self.reset();
        self.set_phase(Phase::Populating);
        self.round_size = Some(size);

        for token_id in size.token_ids() {
            let color = self.rng.sample_color();
            let footprint = self.container.attach(token_id, color);
            self.tokens.push(Token::new(token_id, color, footprint));
        }

        let footprints: Vec<Size> = self.tokens.iter().map(Token::size).collect();
        let layout = flow_layout(&footprints, self.container.content_size());
        for (token, position) in self.tokens.iter_mut().zip(layout) {
            token.move_to(position);
            self.pending.push(RenderEvent::TokenCreated(token.view()));
        }

        info!(round_size = size.get(), "round: tokens created");
        self.set_phase(Phase::Waiting);
        Ok(())
    }

    pub fn scramble_step(&mut self) -> Option<u32> {
        let size = self.round_size?;
        let completed = match self.phase {
            Phase::Waiting => 0,
            Phase::Scrambling { completed } if completed < size.get() => completed,
            phase => {
                warn!(phase = phase.name(), "round: scramble outside scramble window");
                return None;
            }
        };

        let bounds = self.container.content_size();
        for token in &mut self.tokens {
            let position = random_position(self.rng.as_mut(), bounds, token.size());
            token.move_to(position);
            self.pending.push(RenderEvent::TokenMoved {
                token_id: token.id(),
                position,
            });
        }

        let completed = completed + 1;
        debug!(
            iteration = completed,
            width = bounds.width,
            height = bounds.height,
            "round: tokens scrambled"
        );
        self.set_phase(Phase::Scrambling { completed });
        Some(completed)
    }

    pub fn enter_testing(&mut self) -> bool {
        let Some(size) = self.round_size else {
            return false;
        };
        if self.phase != (Phase::Scrambling { completed: size.get() }) {
            warn!(phase = self.phase.name(), "round: testing entered out of order");
            return false;
        }

        for token in &mut self.tokens {
            if token.set_label_visible(false) {
                self.pending.push(RenderEvent::LabelToggled {
                    token_id: token.id(),
                    visible: false,
                });
            }
            if token.set_clickable(true) {
                self.pending.push(RenderEvent::ClickableToggled {
                    token_id: token.id(),
                    clickable: true,
                });
            }
        }

        self.expected_next = TokenId(1);
        self.set_phase(Phase::Testing);
        true
    }

    pub fn click(&mut self, token_id: TokenId) -> ClickOutcome {
        if self.phase != Phase::Testing {
            debug!(%token_id, phase = self.phase.name(), "round: click ignored");
            return ClickOutcome::Ignored;
        }
        let Some(size) = self.round_size else {
            return ClickOutcome::Ignored;
        };
        let Some(token) = self.tokens.iter_mut().find(|token| token.id() == token_id) else {
            debug!(%token_id, "round: click on unknown token");
            return ClickOutcome::Ignored;
        };
        if !token.clickable() {
            return ClickOutcome::Ignored;
        }

        if token_id != self.expected_next {
            let err = GameError::SequenceMismatch {
                expected: self.expected_next,
                clicked: token_id,
            };
            info!(expected = %self.expected_next, clicked = %token_id, "round: sequence mismatch");
            self.finish(Phase::Failed);
            return ClickOutcome::Failed(err);
        }

        if token.set_label_visible(true) {
            self.pending.push(RenderEvent::LabelToggled {
                token_id,
                visible: true,
            });
        }
        self.expected_next = TokenId(token_id.0 + 1);

        if token_id.0 == size.get() {
            info!(round_size = size.get(), "round: all tokens matched");
            self.finish(Phase::Won);
            return ClickOutcome::Won;
        }

        ClickOutcome::Matched {
            token_id,
            remaining: size.get() - token_id.0,
        }
    }

    pub fn reset(&mut self) {
        for token in self.tokens.drain(..) {
            self.container.detach(token.id());
            self.pending.push(RenderEvent::TokenRemoved {
                token_id: token.id(),
            });
        }
        self.expected_next = TokenId(1);
        self.round_size = None;
        self.set_phase(Phase::Idle);
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            round_size: self.round_size,
            expected_next: self.expected_next,
            tokens: self.tokens.iter().map(Token::view).collect(),
        }
    }

    pub fn take_events(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.pending)
    }

    // Terminal phases reveal every label and lock every token.
    fn finish(&mut self, phase: Phase) {
        for token in &mut self.tokens {
            if token.set_label_visible(true) {
                self.pending.push(RenderEvent::LabelToggled {
                    token_id: token.id(),
                    visible: true,
                });
            }
            if token.set_clickable(false) {
                self.pending.push(RenderEvent::ClickableToggled {
                    token_id: token.id(),
                    clickable: false,
                });
            }
        }
        self.set_phase(phase);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            self.phase = phase;
            self.pending.push(RenderEvent::PhaseChanged { phase });
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
