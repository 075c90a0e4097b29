use std::sync::Arc;

use host_integration::{OutcomeNotifier, SilentNotifier};
use shared::{
    domain::{Outcome, Phase, RoundGeneration, RoundSize, TokenId},
    messages::Messages,
    protocol::{GameSnapshot, RenderEvent},
};
use tokio::{
    sync::{broadcast, watch, Mutex},
    task::JoinHandle,
    time::sleep,
};
use tracing::{debug, info};

use crate::{
    controller::{ClickOutcome, GameController},
    timing::RoundTiming,
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDisposition {
    Started { generation: RoundGeneration },
    Ignored,
}

pub struct GameSession {
    inner: Mutex<SessionState>,
    events: broadcast::Sender<RenderEvent>,
    phase: watch::Sender<Phase>,
    notifier: Arc<dyn OutcomeNotifier>,
    messages: Messages,
    timing: RoundTiming,
}

struct SessionState {
    controller: GameController,
    generation: RoundGeneration,
    cleared: RoundGeneration,
    timed_task: Option<JoinHandle<()>>,
}

impl GameSession {
    pub fn new(controller: GameController, timing: RoundTiming) -> Arc<Self> {
        Self::new_with_dependencies(
            controller,
            timing,
            Arc::new(SilentNotifier),
            Messages::default(),
        )
    }

    pub fn new_with_dependencies(
        controller: GameController,
        timing: RoundTiming,
        notifier: Arc<dyn OutcomeNotifier>,
        messages: Messages,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (phase, _) = watch::channel(controller.phase());
        Arc::new(Self {
            inner: Mutex::new(SessionState {
                controller,
                generation: RoundGeneration(0),
                cleared: RoundGeneration(0),
                timed_task: None,
            }),
            events,
            phase,
            notifier,
            messages,
            timing,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<RenderEvent> {
        self.events.subscribe()
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    pub fn timing(&self) -> RoundTiming {
        self.timing
    }

    pub async fn snapshot(&self) -> GameSnapshot {
        self.inner.lock().await.controller.snapshot()
    }

    pub async fn start(self: &Arc<Self>, size: RoundSize) -> StartDisposition {
        let mut state = self.inner.lock().await;
        if let Err(err) = state.controller.start(size) {
            debug!(%err, "round: start ignored");
            return StartDisposition::Ignored;
        }

        state.generation = state.generation.next();
        let generation = state.generation;
        if let Some(previous) = state.timed_task.take() {
            previous.abort();
        }
        self.publish(&mut state);
        info!(
            generation = generation.0,
            round_size = size.get(),
            "round: started"
        );

        let session = Arc::clone(self);
        state.timed_task = Some(tokio::spawn(async move {
            session.run_timed_phases(generation, size).await;
        }));
        StartDisposition::Started { generation }
    }

    pub async fn click(self: &Arc<Self>, token_id: TokenId) -> ClickOutcome {
        let (outcome, generation) = {
            let mut state = self.inner.lock().await;
            let outcome = state.controller.click(token_id);
            self.publish(&mut state);
            (outcome, state.generation)
        };

        match &outcome {
            ClickOutcome::Won => {
                let session = Arc::clone(self);
                let delay = self.timing.win_notice_delay();
                tokio::spawn(async move {
                    sleep(delay).await;
                    session.announce(generation, Outcome::Won).await;
                });
            }
            ClickOutcome::Failed(err) => {
                info!(generation = generation.0, %err, "round: failed");
                self.announce(generation, Outcome::Failed).await;
            }
            ClickOutcome::Matched { .. } | ClickOutcome::Ignored => {}
        }
        outcome
    }

    /// Destroys the current round. A timed task or win notice still pending for it is dropped.
    pub async fn reset(&self) {
        let mut state = self.inner.lock().await;
        state.cleared = state.generation;
        state.generation = state.generation.next();
        if let Some(task) = state.timed_task.take() {
            task.abort();
        }
        state.controller.reset();
        self.publish(&mut state);
        debug!(generation = state.generation.0, "round: reset");
    }

    /// Resolves once the round accepts clicks or has finished. Pending forever while Idle.
    pub async fn wait_for_testing(&self) -> Phase {
        let mut phases = self.phase.subscribe();
        let reached = match phases
            .wait_for(|phase| *phase == Phase::Testing || phase.is_finished())
            .await
        {
            Ok(phase) => *phase,
            Err(_) => self.phase(),
        };
        reached
    }

    async fn run_timed_phases(self: Arc<Self>, generation: RoundGeneration, size: RoundSize) {
        sleep(self.timing.memorize_delay(size)).await;

        for _ in 0..size.get() {
            {
                let mut state = self.inner.lock().await;
                if state.generation != generation {
                    debug!(generation = generation.0, "round: superseded before scramble");
                    return;
                }
                let Some(iteration) = state.controller.scramble_step() else {
                    return;
                };
                debug!(generation = generation.0, iteration, "round: scramble iteration");
                self.publish(&mut state);
            }
            sleep(self.timing.scramble_pause()).await;
        }

        let mut state = self.inner.lock().await;
        if state.generation != generation {
            debug!(generation = generation.0, "round: superseded before testing");
            return;
        }
        if state.controller.enter_testing() {
            info!(generation = generation.0, "round: accepting clicks");
        }
        self.publish(&mut state);
    }

    // A round superseded by `start` still gets its outcome; only `reset` cancels it.
    async fn announce(&self, generation: RoundGeneration, outcome: Outcome) {
        {
            let state = self.inner.lock().await;
            if generation <= state.cleared {
                debug!(generation = generation.0, ?outcome, "round: outcome dropped after reset");
                return;
            }
            let _ = self.events.send(RenderEvent::RoundFinished {
                generation,
                outcome,
            });
        }

        let message = match outcome {
            Outcome::Won => &self.messages.correct,
            Outcome::Failed => &self.messages.wrong,
        };
        self.notifier.notify(outcome, message).await;
    }

    fn publish(&self, state: &mut SessionState) {
        for event in state.controller.take_events() {
            let _ = self.events.send(event);
        }
        self.phase.send_replace(state.controller.phase());
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
