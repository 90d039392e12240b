pub mod trip_repo;

pub use trip_repo::TripRepo;
