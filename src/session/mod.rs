//! Workout Session State Machine
//!
//! One workout, modelled as a finite-state type with a pure transition
//! function `(state, event) -> (state, effects)`:
//!
//! - Uninitialized -> InProgress on start (fresh or resumed)
//! - InProgress -> AwaitingReps when the current set is a minimum set
//! - a completed set moves to Resting, or straight to Finished after the last set
//! - Resting -> InProgress when the countdown runs out or is skipped
//!
//! Persistence, timers and cues are effects; `runner` applies them.

pub mod runner;

use chrono::{DateTime, Utc};

use crate::catalog::ProgramCatalog;
use crate::models::{ActiveWorkout, CompletedSet, CompletedWorkout, DayOfWeek};

pub use runner::WorkoutSession;

// ---------------------------------------------------------------------------
/// Inputs
// ---------------------------------------------------------------------------

/// Which workout to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub program: String,
    pub week: u32,
    pub day: DayOfWeek,
    /// Adopt the persisted active workout if there is one
    pub resume: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// `saved` is the persisted active workout, read by the caller when resuming
    Start {
        request: SessionRequest,
        saved: Option<ActiveWorkout>,
        now: DateTime<Utc>,
    },
    CompleteSet { now: DateTime<Utc> },
    /// Actual count for a minimum set. Not re-validated here.
    SubmitReps { reps: u32, now: DateTime<Utc> },
    CancelRepEntry,
    /// One second of rest elapsed
    Tick,
    SkipRest,
}

// ---------------------------------------------------------------------------
/// States
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Uninitialized,
    InProgress(ActiveWorkout),
    /// Minimum set done, waiting for the athlete's count (at least `minimum`)
    AwaitingReps { workout: ActiveWorkout, minimum: u32 },
    Resting {
        workout: ActiveWorkout,
        remaining_seconds: u32,
    },
    Finished(CompletedWorkout),
}

impl SessionState {
    /// The working copy of the active workout, if the session is open
    pub fn workout(&self) -> Option<&ActiveWorkout> {
        match self {
            Self::InProgress(workout)
            | Self::AwaitingReps { workout, .. }
            | Self::Resting { workout, .. } => Some(workout),
            Self::Uninitialized | Self::Finished(_) => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::InProgress(_) => "in_progress",
            Self::AwaitingReps { .. } => "awaiting_reps",
            Self::Resting { .. } => "resting",
            Self::Finished(_) => "finished",
        }
    }
}

// ---------------------------------------------------------------------------
/// Outputs
// ---------------------------------------------------------------------------

/// Feedback moments for the front end (haptics, bells)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    SetComplete,
    RestOver,
    WorkoutComplete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Overwrite the persisted active-workout slot
    SaveActiveWorkout(ActiveWorkout),
    /// Cosmetic pause between the last set and the finished screen
    FinishDelay,
    /// Add to history (replacing the same week/day) and clear the active slot
    RecordCompletion(CompletedWorkout),
    Cue(Cue),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: SessionState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(state: SessionState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }
}

// ---------------------------------------------------------------------------
/// Transition Function
// ---------------------------------------------------------------------------

pub fn transition(catalog: &ProgramCatalog, state: SessionState, event: SessionEvent) -> Transition {
    match (state, event) {
        (SessionState::Uninitialized, SessionEvent::Start { request, saved, now }) => {
            start(catalog, request, saved, now)
        }

        (SessionState::InProgress(workout), SessionEvent::CompleteSet { now }) => {
            let Some(target) = workout.current_set().map(|set| set.target_reps) else {
                // Every set already recorded
                return finish(workout, now, Vec::new());
            };
            match target.automatic_reps() {
                Some(reps) => record_set(workout, reps, now),
                None => Transition::to(SessionState::AwaitingReps {
                    workout,
                    minimum: target.value(),
                }),
            }
        }

        (SessionState::AwaitingReps { workout, .. }, SessionEvent::SubmitReps { reps, now }) => {
            record_set(workout, reps, now)
        }

        (SessionState::AwaitingReps { workout, .. }, SessionEvent::CancelRepEntry) => {
            Transition::to(SessionState::InProgress(workout))
        }

        (
            SessionState::Resting {
                workout,
                remaining_seconds,
            },
            SessionEvent::Tick,
        ) => {
            if remaining_seconds <= 1 {
                Transition::with(SessionState::InProgress(workout), vec![Effect::Cue(Cue::RestOver)])
            } else {
                Transition::to(SessionState::Resting {
                    workout,
                    remaining_seconds: remaining_seconds - 1,
                })
            }
        }

        (SessionState::Resting { workout, .. }, SessionEvent::SkipRest) => {
            Transition::to(SessionState::InProgress(workout))
        }

        (state, event) => {
            tracing::debug!("Ignoring {:?} while {}", event, state.name());
            Transition::to(state)
        }
    }
}

fn start(
    catalog: &ProgramCatalog,
    request: SessionRequest,
    saved: Option<ActiveWorkout>,
    now: DateTime<Utc>,
) -> Transition {
    let saved = saved.filter(|workout| {
        if workout.sets.is_empty() {
            tracing::warn!(
                "Discarding saved {} week {} {} with no sets",
                workout.program_name,
                workout.week,
                workout.day
            );
        }
        !workout.sets.is_empty()
    });

    if request.resume {
        if let Some(workout) = saved {
            tracing::debug!(
                "Resuming {} week {} {} at set {}",
                workout.program_name,
                workout.week,
                workout.day,
                workout.current_set_index + 1
            );
            if workout.is_complete() {
                return finish(workout, now, Vec::new());
            }
            return Transition::to(SessionState::InProgress(workout));
        }
    }

    let sets = catalog.load_workout_for_day(&request.program, request.week, request.day);
    if sets.is_empty() {
        tracing::warn!(
            "No sets for {} week {} {}; nothing to start",
            request.program,
            request.week,
            request.day
        );
        return Transition::to(SessionState::Uninitialized);
    }

    let workout = ActiveWorkout::new(
        &request.program,
        request.week,
        request.day,
        catalog.rest_between_sets(&request.program),
        sets,
        now,
    );
    tracing::debug!(
        "Starting {} week {} {} with {} sets",
        workout.program_name,
        workout.week,
        workout.day,
        workout.sets.len()
    );

    Transition::with(
        SessionState::InProgress(workout.clone()),
        vec![Effect::SaveActiveWorkout(workout)],
    )
}

fn record_set(mut workout: ActiveWorkout, actual_reps: u32, now: DateTime<Utc>) -> Transition {
    let Some(target_reps) = workout.current_set().map(|set| set.target_reps) else {
        return finish(workout, now, Vec::new());
    };

    workout.completed_sets.push(CompletedSet {
        set_number: workout.current_set_index as u32 + 1,
        target_reps,
        actual_reps,
        completed_at: now,
    });
    workout.current_set_index += 1;

    let effects = vec![
        Effect::SaveActiveWorkout(workout.clone()),
        Effect::Cue(Cue::SetComplete),
    ];

    if workout.is_complete() {
        let mut effects = effects;
        effects.push(Effect::FinishDelay);
        return finish(workout, now, effects);
    }

    let rest = workout.rest_between_sets_seconds;
    if rest == 0 {
        return Transition::with(SessionState::InProgress(workout), effects);
    }

    Transition::with(
        SessionState::Resting {
            workout,
            remaining_seconds: rest,
        },
        effects,
    )
}

fn finish(workout: ActiveWorkout, now: DateTime<Utc>, mut effects: Vec<Effect>) -> Transition {
    let duration_seconds = u64::try_from((now - workout.started_at).num_seconds()).unwrap_or(0);

    let completed = CompletedWorkout {
        id: generate_workout_id(),
        total_reps: workout.total_reps(),
        program_name: workout.program_name,
        week: workout.week,
        day: workout.day,
        completed_at: now,
        sets: workout.completed_sets,
        duration_seconds,
    };

    effects.push(Effect::Cue(Cue::WorkoutComplete));
    effects.push(Effect::RecordCompletion(completed.clone()));

    Transition::with(SessionState::Finished(completed), effects)
}

pub fn generate_workout_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
