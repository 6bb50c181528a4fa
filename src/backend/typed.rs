use async_trait::async_trait;
use serde_json::Value;

use super::transport::Transport;
use super::BackendClient;
use crate::models::{BackendRequest, TimingRequest, TopL7AnalysisRequest};
use crate::{EdgeMetricsError, Result};

pub const DESCRIBE_TOP_L7_ANALYSIS_DATA: &str = "DescribeTopL7AnalysisData";
pub const DESCRIBE_TIMING_L7_ANALYSIS_DATA: &str = "DescribeTimingL7AnalysisData";
pub const DESCRIBE_TIMING_L7_ORIGIN_PULL_DATA: &str = "DescribeTimingL7OriginPullData";

/// EdgeOne client with one method per supported operation.
pub struct TeoClient {
    transport: Transport,
}

impl TeoClient {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn describe_top_l7_analysis_data(&self, params: &TopL7AnalysisRequest) -> Result<Value> {
        self.transport.call(DESCRIBE_TOP_L7_ANALYSIS_DATA, params).await
    }

    pub async fn describe_timing_l7_analysis_data(&self, params: &TimingRequest) -> Result<Value> {
        self.transport.call(DESCRIBE_TIMING_L7_ANALYSIS_DATA, params).await
    }

    pub async fn describe_timing_l7_origin_pull_data(&self, params: &TimingRequest) -> Result<Value> {
        self.transport.call(DESCRIBE_TIMING_L7_ORIGIN_PULL_DATA, params).await
    }
}

#[async_trait]
impl BackendClient for TeoClient {
    async fn invoke(&self, action: &str, request: &BackendRequest) -> Result<Value> {
        match (action, request) {
            (DESCRIBE_TOP_L7_ANALYSIS_DATA, BackendRequest::TopAnalysis(params)) => {
                self.describe_top_l7_analysis_data(params).await
            }
            (DESCRIBE_TIMING_L7_ANALYSIS_DATA, BackendRequest::Timing(params)) => {
                self.describe_timing_l7_analysis_data(params).await
            }
            (DESCRIBE_TIMING_L7_ORIGIN_PULL_DATA, BackendRequest::Timing(params)) => {
                self.describe_timing_l7_origin_pull_data(params).await
            }
            _ => Err(EdgeMetricsError::UnsupportedOperation(action.to_string())),
        }
    }
}
