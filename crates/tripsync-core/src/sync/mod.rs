//! Trip-to-odometer synchronization.
//!
//! The engine walks every Trip Source vehicle: match it to a Maintenance
//! Log vehicle by VIN tag, resolve the odometer watermark, fetch trips,
//! normalize the qualifying ones into odometer events, and deliver each
//! event to the CSV ledger and the Maintenance Log.

pub mod engine;
pub mod ledger;
pub mod matcher;
pub mod normalizer;
pub mod watermark;

pub use engine::{SyncEngine, SyncReport};
pub use matcher::match_vehicle;
pub use normalizer::{OdometerEvent, TripNormalizer};
