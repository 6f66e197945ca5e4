// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::engines::traits::{EngineError, FetchRequest, FetchResponse, PageFetcher};
use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;
use url::Url;

/// 抓取引擎
///
/// 基于reqwest实现的HTTP页面获取引擎，整个运行期间复用同一个客户端
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建引擎
    ///
    /// # 参数
    ///
    /// * `user_agent` - 请求使用的 User-Agent
    pub fn new(user_agent: &str) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for ReqwestEngine {
    /// 执行HTTP获取
    ///
    /// # 参数
    ///
    /// * `request` - 页面请求
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchResponse)` - 2xx 响应
    /// * `Err(EngineError)` - 传输失败或非 2xx 状态
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse, EngineError> {
        let url = Url::parse(&request.url)
            .map_err(|e| EngineError::InvalidUrl(format!("{}: {}", request.url, e)))?;

        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .query(&request.query)
            .timeout(request.timeout)
            .send()
            .await?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            return Err(EngineError::HttpStatus {
                status: status.as_u16(),
                url: final_url,
            });
        }

        let content = response.text().await?;
        let elapsed = start.elapsed().as_millis() as u64;
        debug!(url = %final_url, status = status.as_u16(), elapsed_ms = elapsed, "page fetched");

        Ok(FetchResponse {
            status_code: status.as_u16(),
            final_url,
            content,
            response_time_ms: elapsed,
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
