use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Metrics answered by `DescribeTimingL7OriginPullData`.
pub const ORIGIN_PULL_METRICS: &[&str] = &[
    "l7Flow_outFlux_hy",
    "l7Flow_outBandwidth_hy",
    "l7Flow_request_hy",
    "l7Flow_inFlux_hy",
    "l7Flow_inBandwidth_hy",
];

/// Metrics answered by `DescribeTopL7AnalysisData`.
pub const TOP_ANALYSIS_METRICS: &[&str] = &[
    "l7Flow_outFlux_country",
    "l7Flow_outFlux_province",
    "l7Flow_outFlux_statusCode",
    "l7Flow_outFlux_domain",
    "l7Flow_outFlux_url",
    "l7Flow_outFlux_resourceType",
    "l7Flow_outFlux_sip",
    "l7Flow_outFlux_referers",
    "l7Flow_outFlux_ua_device",
    "l7Flow_outFlux_ua_browser",
    "l7Flow_outFlux_ua_os",
    "l7Flow_outFlux_ua",
    "l7Flow_request_country",
    "l7Flow_request_province",
    "l7Flow_request_statusCode",
    "l7Flow_request_domain",
    "l7Flow_request_url",
    "l7Flow_request_resourceType",
    "l7Flow_request_sip",
    "l7Flow_request_referers",
    "l7Flow_request_ua_device",
    "l7Flow_request_ua_browser",
    "l7Flow_request_ua_os",
    "l7Flow_request_ua",
];

/// Metrics answered by `DescribeWebProtectionData`.
pub const SECURITY_METRICS: &[&str] = &[
    "ccAcl_interceptNum",
    "ccManage_interceptNum",
    "ccRate_interceptNum",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MetricCategory {
    OriginPull,
    TopAnalysis,
    Security,
    TimingAnalysis,
}

impl MetricCategory {
    /// Backend action that answers metrics of this category.
    pub const fn action(self) -> &'static str {
        match self {
            MetricCategory::OriginPull => "DescribeTimingL7OriginPullData",
            MetricCategory::TopAnalysis => "DescribeTopL7AnalysisData",
            MetricCategory::Security => "DescribeWebProtectionData",
            MetricCategory::TimingAnalysis => "DescribeTimingL7AnalysisData",
        }
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

struct Rule {
    members: HashSet<&'static str>,
    category: MetricCategory,
}

/// Ordered membership rules; the first rule containing the metric wins and
/// anything unmatched falls through to the fallback category.
pub struct Classifier {
    rules: Vec<Rule>,
    fallback: MetricCategory,
}

impl Classifier {
    pub fn new(fallback: MetricCategory) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    pub fn rule(mut self, category: MetricCategory, members: &[&'static str]) -> Self {
        self.rules.push(Rule {
            members: members.iter().copied().collect(),
            category,
        });
        self
    }

    pub fn classify(&self, metric: &str) -> MetricCategory {
        self.rules
            .iter()
            .find(|rule| rule.members.contains(metric))
            .map(|rule| rule.category)
            .unwrap_or(self.fallback)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::new(MetricCategory::TimingAnalysis)
            .rule(MetricCategory::TopAnalysis, TOP_ANALYSIS_METRICS)
            .rule(MetricCategory::Security, SECURITY_METRICS)
            .rule(MetricCategory::OriginPull, ORIGIN_PULL_METRICS)
    }
}

lazy_static! {
    static ref DEFAULT_CLASSIFIER: Classifier = Classifier::default();
}

/// Classifies against the built-in EdgeOne tables.
pub fn classify(metric: &str) -> MetricCategory {
    DEFAULT_CLASSIFIER.classify(metric)
}
