use crate::compliance::domain::{CompositionScanStatus, PolicyResult, StaticScanStatus};
use chrono::{DateTime, Duration, Months, NaiveDateTime, Utc};

const PASSING_POLICY_STATES: [&str; 2] = ["PASSED", "CONDITIONAL_PASS"];

/// Scans strictly older than this instant are outdated.
///
/// Computed once per run so every record in a report shares one reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff(DateTime<Utc>);

impl Cutoff {
    /// `now` minus one calendar month.
    pub fn one_month_before(now: DateTime<Utc>) -> Self {
        let instant = now
            .checked_sub_months(Months::new(1))
            .unwrap_or_else(|| now - Duration::days(30));
        Self(instant)
    }

    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn is_outdated(&self, scanned_at: DateTime<Utc>) -> bool {
        scanned_at < self.0
    }
}

/// Parses the timestamp formats the security platform emits.
///
/// Accepts RFC 3339, `+0000`-style offsets and offset-less values, which are read as UTC.
pub fn parse_remote_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

/// True when every attached policy passed, conditionally or outright.
pub fn policies_pass(policies: &[PolicyResult]) -> bool {
    policies.iter().all(|policy| {
        PASSING_POLICY_STATES.contains(&policy.policy_compliance_status.as_str())
    })
}

/// Static-analysis status of one component.
///
/// `last_scan` is `None` when no matching application or static scan exists.
/// A failing policy wins over an outdated scan.
pub fn classify_static_scan(
    cutoff: &Cutoff,
    last_scan: Option<DateTime<Utc>>,
    policies: &[PolicyResult],
) -> StaticScanStatus {
    let Some(scanned_at) = last_scan else {
        return StaticScanStatus::Missing;
    };

    let mut status = StaticScanStatus::Compliant;
    if cutoff.is_outdated(scanned_at) {
        status = StaticScanStatus::Outdated;
    }
    if !policies_pass(policies) {
        status = StaticScanStatus::Noncompliant;
    }
    status
}

/// Composition-analysis status of one component.
///
/// `last_scan` is `None` when no matching project exists. Known vulnerabilities
/// win over an outdated scan.
pub fn classify_composition_scan(
    cutoff: &Cutoff,
    last_scan: Option<DateTime<Utc>>,
    vulnerability_count: u64,
) -> CompositionScanStatus {
    let Some(scanned_at) = last_scan else {
        return CompositionScanStatus::Missing;
    };

    let mut status = CompositionScanStatus::Ok;
    if cutoff.is_outdated(scanned_at) {
        status = CompositionScanStatus::Outdated;
    }
    if vulnerability_count > 0 {
        status = CompositionScanStatus::Vulnerable;
    }
    status
}
