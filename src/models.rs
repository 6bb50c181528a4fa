use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_METRIC: &str = "l7Flow_flux";
pub const AUTO_INTERVAL: &str = "auto";
pub const ALL_ZONES: &str = "*";

/// Raw query string of `GET /traffic`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficParams {
    pub metric: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub interval: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricQuery {
    pub metric: String,
    pub start_time: String,
    pub end_time: String,
    pub interval: Option<String>,
}

impl MetricQuery {
    /// Applies defaults relative to `now`: the last 24 hours of `l7Flow_flux`.
    /// Caller-supplied times are passed through as given.
    pub fn from_params(params: TrafficParams, now: DateTime<Utc>) -> Self {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());

        Self {
            metric: present(params.metric).unwrap_or_else(|| DEFAULT_METRIC.to_string()),
            start_time: present(params.start_time)
                .unwrap_or_else(|| format_time(now - Duration::hours(24))),
            end_time: present(params.end_time).unwrap_or_else(|| format_time(now)),
            interval: present(params.interval).filter(|i| i != AUTO_INTERVAL),
        }
    }
}

/// `YYYY-MM-DDTHH:MM:SSZ`
pub fn format_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parameters of `DescribeTopL7AnalysisData`; takes exactly one metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TopL7AnalysisRequest {
    pub start_time: String,
    pub end_time: String,
    pub metric_name: String,
    pub zone_ids: Vec<String>,
}

/// Parameters shared by the timing and web-protection operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimingRequest {
    pub start_time: String,
    pub end_time: String,
    pub metric_names: Vec<String>,
    pub zone_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BackendRequest {
    TopAnalysis(TopL7AnalysisRequest),
    Timing(TimingRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub site_name: String,
    pub site_icon: String,
}
