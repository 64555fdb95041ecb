#[cfg(feature = "cli")]
pub mod cli;
pub mod snapshot;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::cli::{parse_date, parse_now};
    use crate::utils::error::{CareError, Result};
    use crate::utils::validation::{validate_path, Validate};
    use chrono::{NaiveDate, NaiveDateTime};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "care-dose")]
    #[command(about = "Medication schedule and adherence report for caregivers")]
    pub struct CliConfig {
        /// Path to the TOML snapshot with regimens and dose events
        #[arg(short, long)]
        pub snapshot: String,

        /// Optional TOML file overriding windows and scan bounds
        #[arg(long)]
        pub settings: Option<String>,

        /// Evaluate at this local time instead of the system clock (YYYY-MM-DDTHH:MM[:SS])
        #[arg(long, value_parser = parse_now)]
        pub now: Option<NaiveDateTime>,

        /// First day of an adherence period report
        #[arg(long, requires = "to", value_parser = parse_date)]
        pub from: Option<NaiveDate>,

        /// Last day of an adherence period report
        #[arg(long, requires = "from", value_parser = parse_date)]
        pub to: Option<NaiveDate>,

        /// Print the report as JSON
        #[arg(long)]
        pub json: bool,

        /// Emit logs as JSON lines
        #[arg(long)]
        pub log_json: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl CliConfig {
        pub fn period(&self) -> Option<(NaiveDate, NaiveDate)> {
            self.from.zip(self.to)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("snapshot", &self.snapshot)?;
            if let Some(settings) = &self.settings {
                validate_path("settings", settings)?;
            }

            if let Some((from, to)) = self.period() {
                if from > to {
                    return Err(CareError::InvalidConfigValueError {
                        field: "from".to_string(),
                        value: from.to_string(),
                        reason: format!("Period start must not be after --to ({})", to),
                    });
                }
            }

            Ok(())
        }
    }

}
