use crate::domain::model::{DoseEvent, MedicationRegimen};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SiteSuggestion {
    pub last_used: Option<String>,
    pub suggested_next: Option<String>,
}

/// 依照部位輪替順序建議下一個施打或塗抹部位
pub fn compute_sites(regimen: &MedicationRegimen, history: &[DoseEvent]) -> SiteSuggestion {
    let last_used = history
        .iter()
        .filter(|event| event.regimen_id == regimen.id)
        .filter_map(|event| {
            event
                .application_site
                .as_ref()
                .map(|site| (event.timestamp, site))
        })
        .max_by_key(|(timestamp, _)| *timestamp)
        .map(|(_, site)| site.clone());

    let sites = &regimen.application_sites;
    let suggested_next = match last_used.as_ref() {
        None => sites.first().cloned(),
        Some(last) => match sites.iter().position(|site| site == last) {
            Some(index) => sites.get((index + 1) % sites.len()).cloned(),
            // 部位清單被修改過，從頭開始
            None => sites.first().cloned(),
        },
    };

    SiteSuggestion {
        last_used,
        suggested_next,
    }
}
