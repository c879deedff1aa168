use std::collections::HashMap;
use std::sync::Mutex;

use super::StatsReportType;

/// StatsCollector accumulates reports from every transport concurrently
/// (`tokio::join!` fans `collect_stats` out across the ICE/DTLS/SCTP/media
/// transports at once), so it holds its map behind a std `Mutex` rather than
/// requiring an exclusive `&mut self` borrow that would force those calls to
/// be sequential.
#[derive(Debug, Default)]
pub struct StatsCollector {
    reports: Mutex<HashMap<String, StatsReportType>>,
}

impl StatsCollector {
    pub(crate) fn new() -> Self {
        StatsCollector {
            ..Default::default()
        }
    }

    pub(crate) fn merge(&self, stats: HashMap<String, StatsReportType>) {
        self.reports.lock().unwrap().extend(stats)
    }

    pub(crate) fn insert(&self, id: String, stats: StatsReportType) {
        self.reports.lock().unwrap().insert(id, stats);
    }

    pub(crate) fn into_reports(self) -> HashMap<String, StatsReportType> {
        self.reports.into_inner().unwrap()
    }
}
