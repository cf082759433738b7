//! Repository functions for the domain layer (generic over ConnectionTrait).

pub mod events;
pub mod groups;
pub mod participants;
pub mod rounds;
pub mod saves;
