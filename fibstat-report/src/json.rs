//! JSON Output

use crate::report::Report;

/// Version of the report layout written by this crate
pub const SCHEMA_VERSION: u32 = 1;

/// Pretty-printed JSON report
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Parse a report previously written by [`generate_json_report`]
pub fn parse_json_report(json: &str) -> Result<Report, serde_json::Error> {
    serde_json::from_str(json)
}
