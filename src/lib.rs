pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{snapshot::SnapshotFile, toml_config::SettingsConfig};
pub use crate::core::{
    adherence::{
        day_adherence, expected_doses, period_adherence, taken_on, DayAdherence, PeriodAdherence,
    },
    calendar::is_medication_day,
    classifier::{classify_day, classify_dose, DoseTiming},
    engine::{CareEngine, CareReport, RegimenReport},
    rotation::{compute_sites, SiteSuggestion},
    schedule::{compute_next_due, last_scheduled_before, upcoming_doses},
    settings::{GracePolicy, ScanBounds, ScheduleSettings},
    status::{missed_today, resolve_status, MedicationStatus},
};
pub use domain::model::{DoseEvent, DoseStatus, FrequencyKind, MedicationRegimen};
pub use domain::ports::{Clock, FixedClock, SnapshotProvider, SystemClock};
pub use utils::error::{CareError, Result};
