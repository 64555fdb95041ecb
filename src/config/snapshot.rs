use crate::config::toml_config::substitute_env_vars;
use crate::domain::model::{DoseEvent, FrequencyKind, MedicationRegimen};
use crate::domain::ports::SnapshotProvider;
use crate::utils::error::{CareError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_unique, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Regimens and dose log read from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    #[serde(default)]
    pub regimens: Vec<MedicationRegimen>,
    #[serde(default)]
    pub doses: Vec<DoseEvent>,
}

impl SnapshotFile {
    pub fn new(regimens: Vec<MedicationRegimen>, doses: Vec<DoseEvent>) -> Self {
        Self { regimens, doses }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CareError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CareError::TomlParseError {
            source_name: "snapshot".to_string(),
            message: e.to_string(),
        })
    }

    /// 找出計算時會被降級處理的療程設定，只記錄警告不拒絕
    pub fn degraded_regimen_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for regimen in &self.regimens {
            if regimen.times_of_day.is_empty() && !regimen.sporadic_use {
                warnings.push(format!(
                    "regimen '{}' has no times_of_day and will be treated as unscheduled",
                    regimen.id
                ));
            }
            if regimen.frequency == FrequencyKind::IntervalDays && regimen.interval_days <= 0 {
                warnings.push(format!(
                    "regimen '{}' has interval_days = {} and will never recur",
                    regimen.id, regimen.interval_days
                ));
            }
            if regimen.frequency == FrequencyKind::Weekly {
                let invalid: Vec<String> = regimen
                    .week_days
                    .iter()
                    .filter(|day| !(1..=7).contains(*day))
                    .map(|day| day.to_string())
                    .collect();
                if !invalid.is_empty() {
                    warnings.push(format!(
                        "regimen '{}' has weekday numbers outside 1..=7 that are ignored: {}",
                        regimen.id,
                        invalid.join(", ")
                    ));
                }
            }
        }

        warnings
    }
}

impl Validate for SnapshotFile {
    fn validate(&self) -> Result<()> {
        for regimen in &self.regimens {
            validate_non_empty_string("regimens.id", &regimen.id)?;
        }
        validate_unique("regimen id", self.regimens.iter().map(|r| r.id.as_str()))?;
        validate_unique("dose id", self.doses.iter().map(|d| d.id.as_str()))?;

        let known: HashSet<&str> = self.regimens.iter().map(|r| r.id.as_str()).collect();
        if let Some(orphan) = self
            .doses
            .iter()
            .find(|dose| !known.contains(dose.regimen_id.as_str()))
        {
            return Err(CareError::ValidationError {
                message: format!(
                    "dose '{}' references unknown regimen '{}'",
                    orphan.id, orphan.regimen_id
                ),
            });
        }

        for warning in self.degraded_regimen_warnings() {
            tracing::warn!("{}", warning);
        }

        Ok(())
    }
}

impl SnapshotProvider for SnapshotFile {
    fn regimens(&self) -> &[MedicationRegimen] {
        &self.regimens
    }

    fn dose_events(&self) -> &[DoseEvent] {
        &self.doses
    }
}
