//! Time and identity filters over trust material
//!
//! Filters never modify their input; they return new collections that keep
//! the input order.

use crate::material::{CertAuthority, TLogAuthority};
use chrono::{DateTime, Utc};

/// Certificate authorities whose window contains `time`
pub fn filter_cert_authorities(
    authorities: &[CertAuthority],
    time: DateTime<Utc>,
) -> Vec<CertAuthority> {
    authorities
        .iter()
        .filter(|ca| ca.window.contains(time))
        .cloned()
        .collect()
}

/// Criteria for selecting transparency log instances
#[derive(Debug, Clone, Copy)]
pub struct TLogFilter<'a> {
    /// Exact log ID to match, if any
    pub log_id: Option<&'a [u8]>,
    /// Time the log must be valid at; `None` applies no time constraint
    pub target_date: Option<DateTime<Utc>>,
}

/// Logs matching the given criteria
pub fn filter_tlog_authorities(
    authorities: &[TLogAuthority],
    criteria: TLogFilter<'_>,
) -> Vec<TLogAuthority> {
    authorities
        .iter()
        .filter(|log| criteria.target_date.map_or(true, |t| log.window.contains(t)))
        .filter(|log| criteria.log_id.map_or(true, |id| log.log_id == id))
        .cloned()
        .collect()
}
