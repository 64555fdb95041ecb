use crate::app::labels::{adherence_label, status_label, timing_label};
use crate::core::adherence::PeriodAdherence;
use crate::core::engine::{CareReport, RegimenReport};
use crate::core::status::MedicationStatus;
use crate::utils::error::Result;
use chrono::NaiveDate;
use serde::Serialize;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 期間服藥率報表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub adherence: PeriodAdherence,
}

/// 將照護報表轉成純文字行
pub fn render_text(report: &CareReport, period: Option<&PeriodSummary>) -> Vec<String> {
    let mut lines = vec![format!(
        "Report at {} | today's adherence: {} | overdue: {}",
        report.generated_at.format(TIME_FORMAT),
        adherence_label(report.overall_today),
        report.missed_count()
    )];

    for regimen in &report.regimens {
        lines.push(render_regimen(regimen));
        for dose in &regimen.doses_today {
            lines.push(format!(
                "    dose {} at {} -> {}",
                dose.event_id,
                dose.timestamp.format("%H:%M"),
                timing_label(dose.timing)
            ));
        }
    }

    if let Some(period) = period {
        lines.push(format!(
            "Adherence {}..{}: {}",
            period.from,
            period.to,
            adherence_label(period.adherence)
        ));
    }

    lines
}

pub fn render_json(report: &CareReport, period: Option<&PeriodSummary>) -> Result<String> {
    #[derive(Serialize)]
    struct Output<'a> {
        report: &'a CareReport,
        #[serde(skip_serializing_if = "Option::is_none")]
        period: Option<&'a PeriodSummary>,
    }

    Ok(serde_json::to_string_pretty(&Output { report, period })?)
}

fn render_regimen(regimen: &RegimenReport) -> String {
    let mut line = format!("- {} [{}]", regimen.regimen_id, status_label(&regimen.status));

    match regimen.status {
        MedicationStatus::Late { scheduled } => {
            line.push_str(&format!(" since {}", scheduled.format(TIME_FORMAT)));
        }
        MedicationStatus::Upcoming { next_due } => {
            line.push_str(&format!(" next {}", next_due.format(TIME_FORMAT)));
        }
        _ => {}
    }

    line.push_str(&format!(
        " taken {}/{}",
        regimen.today.taken, regimen.today.expected
    ));
    if regimen.today.overdose {
        line.push_str(" OVERDOSE");
    }
    if let Some(site) = &regimen.sites.suggested_next {
        line.push_str(&format!(" next site: {}", site));
    }

    line
}
