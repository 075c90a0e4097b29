use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use shared::domain::{Color, Outcome, Size, TokenId};
use tracing::info;

pub trait Container: Send {
    fn content_size(&self) -> Size;
    fn attach(&mut self, token_id: TokenId, color: Color) -> Size;
    fn detach(&mut self, token_id: TokenId);
}

pub trait RandomSource: Send {
    /// Uniform sample from `0..=max`.
    fn sample_coordinate(&mut self, max: u32) -> u32;
    fn sample_color(&mut self) -> Color;
}

#[async_trait]
pub trait OutcomeNotifier: Send + Sync {
    async fn notify(&self, outcome: Outcome, message: &str);
}

pub struct SilentNotifier;

#[async_trait]
impl OutcomeNotifier for SilentNotifier {
    async fn notify(&self, outcome: Outcome, message: &str) {
        info!(?outcome, message, "round: outcome");
    }
}

pub struct RngSource<R = StdRng> {
    rng: R,
}

impl RngSource<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl<R: Rng + Send> RandomSource for RngSource<R> {
    fn sample_coordinate(&mut self, max: u32) -> u32 {
        self.rng.gen_range(0..=max)
    }

    fn sample_color(&mut self) -> Color {
        Color::from_rgb24(self.rng.gen_range(0..=Color::MAX_RGB24))
    }
}

#[derive(Debug, Clone)]
pub struct VirtualContainer {
    inner: Arc<Mutex<VirtualContainerState>>,
}

#[derive(Debug)]
struct VirtualContainerState {
    content_size: Size,
    token_size: Size,
    children: Vec<(TokenId, Color)>,
}

impl VirtualContainer {
    pub fn new(content_size: Size, token_size: Size) -> Self {
        Self {
            inner: Arc::new(Mutex::new(VirtualContainerState {
                content_size,
                token_size,
                children: Vec::new(),
            })),
        }
    }

    pub fn resize(&self, content_size: Size) {
        self.state().content_size = content_size;
    }

    pub fn children(&self) -> Vec<TokenId> {
        self.state().children.iter().map(|(id, _)| *id).collect()
    }

    pub fn child_color(&self, token_id: TokenId) -> Option<Color> {
        self.state()
            .children
            .iter()
            .find(|(id, _)| *id == token_id)
            .map(|(_, color)| *color)
    }

    fn state(&self) -> MutexGuard<'_, VirtualContainerState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Container for VirtualContainer {
    fn content_size(&self) -> Size {
        self.state().content_size
    }

    fn attach(&mut self, token_id: TokenId, color: Color) -> Size {
        let mut state = self.state();
        state.children.push((token_id, color));
        state.token_size
    }

    fn detach(&mut self, token_id: TokenId) {
        self.state().children.retain(|(id, _)| *id != token_id);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
