use crate::classifier::MetricCategory;
use crate::models::{BackendRequest, MetricQuery, TimingRequest, TopL7AnalysisRequest, ALL_ZONES};

/// Shapes the backend payload for `category`. The top-analysis operation
/// takes a single `MetricName` and no interval; everything else takes a
/// `MetricNames` list.
pub fn build(category: MetricCategory, query: &MetricQuery) -> BackendRequest {
    let zone_ids = vec![ALL_ZONES.to_string()];

    match category {
        MetricCategory::TopAnalysis => BackendRequest::TopAnalysis(TopL7AnalysisRequest {
            start_time: query.start_time.clone(),
            end_time: query.end_time.clone(),
            metric_name: query.metric.clone(),
            zone_ids,
        }),
        MetricCategory::Security | MetricCategory::OriginPull | MetricCategory::TimingAnalysis => {
            BackendRequest::Timing(TimingRequest {
                start_time: query.start_time.clone(),
                end_time: query.end_time.clone(),
                metric_names: vec![query.metric.clone()],
                zone_ids,
                interval: query.interval.clone(),
            })
        }
    }
}
