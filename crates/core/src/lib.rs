//! Wander Wise domain logic.
//!
//! This crate has zero internal deps so it can be used by the repository
//! layer, the API server, and any future CLI tooling. It holds the two
//! pieces of the system with actual invariants:
//!
//! - [`itinerary`] -- the day-partitioned, ordered activity structure of a
//!   trip and its positional reordering operations.
//! - [`budget`] -- the derived spent/remaining/percent-used figures kept
//!   consistent with a trip's expense list.

pub mod budget;
pub mod error;
pub mod itinerary;
