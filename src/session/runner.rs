//! Drives a [`SessionState`] against a real store and clock.
//!
//! Persistence is best effort: a failed write is logged and the in-memory
//! session carries on.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::time::Duration;

use super::{transition, Cue, Effect, SessionEvent, SessionRequest, SessionState};
use crate::catalog::ProgramCatalog;
use crate::progress::ProgressStore;
use crate::storage::KeyValueStore;

const TICK: Duration = Duration::from_secs(1);

pub struct WorkoutSession<'a, S> {
    catalog: &'a ProgramCatalog,
    store: &'a ProgressStore<S>,
    state: SessionState,
    finish_delay: Duration,
    cues: Vec<Cue>,
}

impl<'a, S: KeyValueStore> WorkoutSession<'a, S> {
    pub fn new(catalog: &'a ProgramCatalog, store: &'a ProgressStore<S>, finish_delay: Duration) -> Self {
        Self {
            catalog,
            store,
            state: SessionState::Uninitialized,
            finish_delay,
            cues: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Cues emitted since the last call, oldest first
    pub fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    pub async fn start(&mut self, request: SessionRequest, now: DateTime<Utc>) -> &SessionState {
        let saved = if request.resume {
            self.store.get_active_workout().await
        } else {
            None
        };
        self.dispatch(SessionEvent::Start { request, saved, now }).await
    }

    pub async fn complete_set(&mut self, now: DateTime<Utc>) -> &SessionState {
        self.dispatch(SessionEvent::CompleteSet { now }).await
    }

    pub async fn submit_reps(&mut self, reps: u32, now: DateTime<Utc>) -> &SessionState {
        self.dispatch(SessionEvent::SubmitReps { reps, now }).await
    }

    pub async fn cancel_rep_entry(&mut self) -> &SessionState {
        self.dispatch(SessionEvent::CancelRepEntry).await
    }

    pub async fn tick(&mut self) -> &SessionState {
        self.dispatch(SessionEvent::Tick).await
    }

    pub async fn skip_rest(&mut self) -> &SessionState {
        self.dispatch(SessionEvent::SkipRest).await
    }

    pub async fn dispatch(&mut self, event: SessionEvent) -> &SessionState {
        let state = std::mem::take(&mut self.state);
        let from = state.name();
        let next = transition(self.catalog, state, event);

        if from != next.state.name() {
            tracing::debug!("Session {} -> {}", from, next.state.name());
        }
        self.state = next.state;

        for effect in next.effects {
            self.apply(effect).await;
        }
        &self.state
    }

    /// Count the current rest down once per second until it runs out or
    /// `skip` resolves. `on_tick` sees the remaining seconds after each tick.
    pub async fn run_rest<F, T>(&mut self, skip: F, mut on_tick: T)
    where
        F: Future<Output = ()>,
        T: FnMut(u32),
    {
        if !matches!(self.state, SessionState::Resting { .. }) {
            return;
        }

        tokio::pin!(skip);
        let mut ticker = tokio::time::interval(TICK);
        // First tick fires immediately
        ticker.tick().await;

        while matches!(self.state, SessionState::Resting { .. }) {
            tokio::select! {
                _ = ticker.tick() => {
                    if let SessionState::Resting { remaining_seconds, .. } = self.tick().await {
                        on_tick(*remaining_seconds);
                    }
                }
                _ = skip.as_mut() => {
                    tracing::debug!("Rest skipped");
                    self.skip_rest().await;
                }
            }
        }
    }

    async fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::SaveActiveWorkout(workout) => {
                if let Err(e) = self.store.save_active_workout(&workout).await {
                    tracing::error!("Error saving active workout: {}", e);
                }
            }
            Effect::FinishDelay => {
                if !self.finish_delay.is_zero() {
                    tokio::time::sleep(self.finish_delay).await;
                }
            }
            Effect::RecordCompletion(workout) => {
                tracing::info!(
                    "Completed {} week {} {}: {} reps in {}s",
                    workout.program_name,
                    workout.week,
                    workout.day,
                    workout.total_reps,
                    workout.duration_seconds
                );
                if let Err(e) = self.store.record_completion(&workout).await {
                    tracing::error!("Error recording completed workout: {}", e);
                }
            }
            Effect::Cue(cue) => {
                tracing::debug!("Cue: {:?}", cue);
                self.cues.push(cue);
            }
        }
    }
}
