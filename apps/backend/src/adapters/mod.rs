//! SeaORM adapters. Each takes a `ConnectionTrait` so callers choose between
//! a pooled connection and an open transaction.

pub mod events_sea;
pub mod groups_sea;
pub mod participants_sea;
pub mod rounds_sea;
pub mod saves_sea;
