//! Request handlers for the trip resource and its nested documents.
//!
//! Each submodule provides async handler functions for one slice of the
//! trip aggregate. Handlers authorize through `TripRepo`'s access-checked
//! queries, run domain logic from `wanderwise_core`, and map errors via
//! [`crate::error::AppError`].

pub mod expense;
pub mod itinerary;
pub mod trip;
