use crate::core::settings::{
    GracePolicy, ScanBounds, ScheduleSettings, DEFAULT_FORWARD_SCAN_DAYS,
    DEFAULT_LATE_MATCH_WINDOW_MINUTES, DEFAULT_LATE_THRESHOLD_MINUTES, DEFAULT_LOOKBACK_DAYS,
    DEFAULT_MATCH_WINDOW_MINUTES, DEFAULT_ON_TIME_WINDOW_MINUTES, DEFAULT_WEEKLY_SCAN_DAYS,
};
use crate::utils::error::{CareError, Result};
use crate::utils::validation::{validate_range, Validate};
use chrono::Duration;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Upper bound accepted for any scan setting (about ten years of days).
pub const MAX_SCAN_DAYS: u32 = 3660;
/// Upper bound accepted for any window setting (one week of minutes).
pub const MAX_WINDOW_MINUTES: i64 = 7 * 24 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsConfig {
    #[serde(default)]
    pub windows: WindowsConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub grace_policy: Option<GracePolicy>,
    #[serde(default)]
    pub upcoming_count: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindowsConfig {
    pub late_threshold_minutes: Option<i64>,
    pub late_match_window_minutes: Option<i64>,
    pub on_time_window_minutes: Option<i64>,
    pub match_window_minutes: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    pub forward_days: Option<u32>,
    pub weekly_days: Option<u32>,
    pub lookback_days: Option<u32>,
}

impl SettingsConfig {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CareError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CareError::TomlParseError {
            source_name: "settings".to_string(),
            message: e.to_string(),
        })
    }

    pub fn late_threshold_minutes(&self) -> i64 {
        self.windows
            .late_threshold_minutes
            .unwrap_or(DEFAULT_LATE_THRESHOLD_MINUTES)
    }

    pub fn late_match_window_minutes(&self) -> i64 {
        self.windows
            .late_match_window_minutes
            .unwrap_or(DEFAULT_LATE_MATCH_WINDOW_MINUTES)
    }

    pub fn on_time_window_minutes(&self) -> i64 {
        self.windows
            .on_time_window_minutes
            .unwrap_or(DEFAULT_ON_TIME_WINDOW_MINUTES)
    }

    pub fn match_window_minutes(&self) -> i64 {
        self.windows
            .match_window_minutes
            .unwrap_or(DEFAULT_MATCH_WINDOW_MINUTES)
    }

    pub fn scan_bounds(&self) -> ScanBounds {
        ScanBounds {
            forward_days: self.scan.forward_days.unwrap_or(DEFAULT_FORWARD_SCAN_DAYS),
            weekly_days: self.scan.weekly_days.unwrap_or(DEFAULT_WEEKLY_SCAN_DAYS),
            lookback_days: self.scan.lookback_days.unwrap_or(DEFAULT_LOOKBACK_DAYS),
        }
    }

    /// 轉換成計算引擎使用的設定
    pub fn to_schedule_settings(&self) -> Result<ScheduleSettings> {
        Ok(ScheduleSettings {
            late_threshold: window(
                "windows.late_threshold_minutes",
                self.late_threshold_minutes(),
            )?,
            late_match_window: window(
                "windows.late_match_window_minutes",
                self.late_match_window_minutes(),
            )?,
            on_time_window: window(
                "windows.on_time_window_minutes",
                self.on_time_window_minutes(),
            )?,
            match_window: window("windows.match_window_minutes", self.match_window_minutes())?,
            scan: self.scan_bounds(),
            grace_policy: self.grace_policy.unwrap_or_default(),
        })
    }
}

fn window(field: &str, minutes: i64) -> Result<Duration> {
    Duration::try_minutes(minutes).ok_or_else(|| CareError::InvalidConfigValueError {
        field: field.to_string(),
        value: minutes.to_string(),
        reason: "Value is out of range for a duration".to_string(),
    })
}

impl Validate for SettingsConfig {
    fn validate(&self) -> Result<()> {
        validate_range(
            "windows.late_threshold_minutes",
            self.late_threshold_minutes(),
            0,
            MAX_WINDOW_MINUTES,
        )?;
        validate_range(
            "windows.late_match_window_minutes",
            self.late_match_window_minutes(),
            1,
            MAX_WINDOW_MINUTES,
        )?;
        validate_range(
            "windows.on_time_window_minutes",
            self.on_time_window_minutes(),
            1,
            MAX_WINDOW_MINUTES,
        )?;
        validate_range(
            "windows.match_window_minutes",
            self.match_window_minutes(),
            1,
            MAX_WINDOW_MINUTES,
        )?;

        if self.match_window_minutes() < self.on_time_window_minutes() {
            return Err(CareError::InvalidConfigValueError {
                field: "windows.match_window_minutes".to_string(),
                value: self.match_window_minutes().to_string(),
                reason: format!(
                    "Must not be smaller than windows.on_time_window_minutes ({})",
                    self.on_time_window_minutes()
                ),
            });
        }

        let scan = self.scan_bounds();
        validate_range("scan.forward_days", scan.forward_days, 0, MAX_SCAN_DAYS)?;
        validate_range("scan.weekly_days", scan.weekly_days, 0, MAX_SCAN_DAYS)?;
        validate_range("scan.lookback_days", scan.lookback_days, 0, MAX_SCAN_DAYS)?;

        Ok(())
    }
}

/// 替換環境變數 (例如 ${CARE_DOSE_LOOKBACK})，未設定的變數保持原樣
pub(crate) fn substitute_env_vars(content: &str) -> String {
    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
    });

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}
