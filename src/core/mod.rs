pub mod adherence;
pub mod calendar;
pub mod classifier;
pub mod engine;
pub mod rotation;
pub mod schedule;
pub mod settings;
pub mod status;

pub use crate::domain::model::{DoseEvent, DoseStatus, FrequencyKind, MedicationRegimen};
pub use crate::domain::ports::{Clock, FixedClock, SnapshotProvider, SystemClock};
pub use crate::utils::error::Result;
