//! Error codes for the Mingle backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP responses.

use core::fmt;

/// Centralized error codes for the Mingle backend API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request Validation
    /// Group size out of range
    InvalidGroupSize,
    /// Round duration out of range
    InvalidDuration,
    /// Total round count out of range
    InvalidRoundCount,
    /// Required field missing or blank
    MissingField,
    /// A participant cannot save themselves
    SelfSave,
    /// Too few participants to start a round
    NotEnoughParticipants,
    /// Transition not allowed in the current lifecycle state
    PhaseMismatch,
    /// Referenced entity belongs to another event
    NotInEvent,
    /// General validation error
    ValidationError,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// Event not found
    EventNotFound,
    /// Participant not found
    ParticipantNotFound,
    /// Round not found
    RoundNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Round counter was advanced by a concurrent request
    RoundConflict,
    /// Event code already exists
    EventCodeConflict,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Generic conflict
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Unique constraint violation
    UniqueViolation,
    /// Data corruption detected
    DataCorruption,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidGroupSize => "INVALID_GROUP_SIZE",
            Self::InvalidDuration => "INVALID_DURATION",
            Self::InvalidRoundCount => "INVALID_ROUND_COUNT",
            Self::MissingField => "MISSING_FIELD",
            Self::SelfSave => "SELF_SAVE",
            Self::NotEnoughParticipants => "NOT_ENOUGH_PARTICIPANTS",
            Self::PhaseMismatch => "PHASE_MISMATCH",
            Self::NotInEvent => "NOT_IN_EVENT",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::EventNotFound => "EVENT_NOT_FOUND",
            Self::ParticipantNotFound => "PARTICIPANT_NOT_FOUND",
            Self::RoundNotFound => "ROUND_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::RoundConflict => "ROUND_CONFLICT",
            Self::EventCodeConflict => "EVENT_CODE_CONFLICT",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
