//! Services orchestrate repos, the domain layer and matchers.

pub mod connections;
pub mod events;
pub mod matching;
pub mod rounds;
