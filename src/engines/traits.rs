// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败（超时、DNS、连接等）
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非 2xx 响应
    #[error("Unexpected status {status} from {url}")]
    HttpStatus { status: u16, url: String },
    /// 无效URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl EngineError {
    /// 是否为超时错误
    pub fn is_timeout(&self) -> bool {
        matches!(self, EngineError::RequestFailed(e) if e.is_timeout())
    }
}

/// 页面请求
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// 目标URL
    pub url: String,
    /// 查询参数，按顺序追加
    pub query: Vec<(String, String)>,
    /// 超时时间
    pub timeout: Duration,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            timeout,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// 页面响应
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP状态码
    pub status_code: u16,
    /// 重定向后的最终地址
    pub final_url: String,
    /// 响应内容
    pub content: String,
    /// 响应时间（毫秒）
    pub response_time_ms: u64,
}

/// 页面获取引擎特质
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 获取一个页面，非 2xx 响应视为错误
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
