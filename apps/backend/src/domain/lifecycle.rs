//! Event/round state machine.
//!
//! Pure: callers load the persisted status and counter, ask for a plan, and
//! commit it with a conditional write keyed on the counter they read.

use serde::Serialize;

use crate::errors::domain::{DomainError, InfraErrorKind, ValidationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Lobby,
    Active,
    Ended,
}

/// Where an event sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "round_no", rename_all = "snake_case")]
pub enum RoundPhase {
    Lobby,
    RoundActive(i16),
    Ended,
}

/// Committed lifecycle edges, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundTransition {
    /// Lobby -> first round
    EventStarted,
    /// A round became the current one
    RoundStarted { round_no: i16 },
    /// Last round closed
    EventEnded,
}

/// What a successful start will write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartPlan {
    /// Counter value the conditional write must still observe
    pub expected_round: i16,
    pub next_round: i16,
    /// Round that gets its `ended_at` stamped, if any
    pub closes_round: Option<i16>,
    pub transitions: Vec<RoundTransition>,
}

/// What a successful completion will write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletePlan {
    pub expected_round: i16,
    pub closes_round: i16,
}

impl RoundPhase {
    /// Interpret persisted state, rejecting combinations the lifecycle never produces.
    pub fn from_persisted(
        status: EventStatus,
        current_round: i16,
        total_rounds: i16,
    ) -> Result<Self, DomainError> {
        let corrupt = || {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!(
                    "event state {status:?} with round {current_round} of {total_rounds} is inconsistent"
                ),
            )
        };
        match status {
            EventStatus::Lobby if current_round == 0 => Ok(RoundPhase::Lobby),
            EventStatus::Active if (1..=total_rounds).contains(&current_round) => {
                Ok(RoundPhase::RoundActive(current_round))
            }
            EventStatus::Ended if current_round == total_rounds && total_rounds > 0 => {
                Ok(RoundPhase::Ended)
            }
            _ => Err(corrupt()),
        }
    }

    pub fn current_round(&self, total_rounds: i16) -> i16 {
        match self {
            RoundPhase::Lobby => 0,
            RoundPhase::RoundActive(n) => *n,
            RoundPhase::Ended => total_rounds,
        }
    }

    pub fn plan_start(&self, total_rounds: i16) -> Result<StartPlan, DomainError> {
        match *self {
            RoundPhase::Lobby => Ok(StartPlan {
                expected_round: 0,
                next_round: 1,
                closes_round: None,
                transitions: vec![
                    RoundTransition::EventStarted,
                    RoundTransition::RoundStarted { round_no: 1 },
                ],
            }),
            RoundPhase::RoundActive(n) if n < total_rounds => Ok(StartPlan {
                expected_round: n,
                next_round: n + 1,
                closes_round: Some(n),
                transitions: vec![RoundTransition::RoundStarted { round_no: n + 1 }],
            }),
            RoundPhase::RoundActive(n) => Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!("round {n} is the last of {total_rounds}; complete the event instead"),
            )),
            RoundPhase::Ended => Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "event has ended",
            )),
        }
    }

    pub fn plan_complete(&self, total_rounds: i16) -> Result<CompletePlan, DomainError> {
        match *self {
            RoundPhase::RoundActive(n) if n == total_rounds => Ok(CompletePlan {
                expected_round: n,
                closes_round: n,
            }),
            RoundPhase::RoundActive(n) => Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                format!("round {n} of {total_rounds} is still running; start the next round"),
            )),
            RoundPhase::Lobby => Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "event has not started",
            )),
            RoundPhase::Ended => Err(DomainError::validation(
                ValidationKind::PhaseMismatch,
                "event has already ended",
            )),
        }
    }
}

/// Replay committed transitions from the rounds that exist and the end flag.
pub fn replay_transitions(round_nos: &[i16], ended: bool) -> Vec<RoundTransition> {
    let mut out = Vec::with_capacity(round_nos.len() + 2);
    if !round_nos.is_empty() {
        out.push(RoundTransition::EventStarted);
    }
    out.extend(
        round_nos
            .iter()
            .map(|&round_no| RoundTransition::RoundStarted { round_no }),
    );
    if ended {
        out.push(RoundTransition::EventEnded);
    }
    out
}
