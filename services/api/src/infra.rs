use metrics_exporter_prometheus::PrometheusHandle;
use school_outreach::outreach::participation::{
    ParticipationValidator, ProgramCatalog, StatusFilter, YearFilter,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: Arc<ProgramCatalog>,
    pub(crate) validator: ParticipationValidator,
}

pub(crate) fn parse_year_filter(raw: &str) -> Result<YearFilter, String> {
    raw.parse()
        .map_err(|err| format!("failed to parse '{raw}' as YYYY/YYYY or 'all' ({err})"))
}

pub(crate) fn parse_status_filter(raw: &str) -> Result<StatusFilter, String> {
    raw.parse().map_err(|err| format!("{err}"))
}
