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

use config::ConfigError;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::markup::SelectorError;
use crate::config::settings::Settings;
use crate::domain::models::kingdom::KINGDOMS;
use crate::domain::models::report::CategoryReport;
use crate::domain::models::vulnerability::Vulnerability;
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::domain::services::detail_service::DetailService;
use crate::domain::services::listing_service::ListingService;
use crate::domain::services::report_service::{ReportFiles, ReportService};
use crate::engines::traits::PageFetcher;
use crate::utils::errors::ReportError;

#[derive(Error, Debug)]
pub enum CrawlUseCaseError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Selector error: {0}")]
    Selector(#[from] SelectorError),
    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// 单个分类的爬取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KingdomOutcome {
    pub kingdom: String,
    pub pages: usize,
    pub vulnerability_count: usize,
    /// 没有记录时不写文件，为 None
    pub files: Option<ReportFiles>,
}

/// 爬取用例
///
/// 依次完成：分类描述 → 逐页列表 → 每行详情 → 写出报告。
/// 所有请求串行执行，每页处理完后等待固定间隔
pub struct CrawlUseCase {
    listing: ListingService,
    detail: DetailService,
    reports: ReportService,
    page_delay: Duration,
    settings: Settings,
}

impl CrawlUseCase {
    /// 根据配置组装用例
    ///
    /// # 参数
    ///
    /// * `settings` - 已加载的配置
    /// * `fetcher` - 页面获取引擎
    /// * `storage` - 输出目录存储
    pub fn new(
        settings: &Settings,
        fetcher: Arc<dyn PageFetcher>,
        storage: Arc<dyn StorageRepository>,
    ) -> Result<Self, CrawlUseCaseError> {
        let markup = Arc::new(settings.site_markup().compile()?);
        let timeout = settings.request_timeout();

        Ok(Self {
            listing: ListingService::new(
                fetcher.clone(),
                markup.clone(),
                settings.base_url()?,
                settings.listing_url()?,
                timeout,
            ),
            detail: DetailService::new(fetcher, markup, timeout),
            reports: ReportService::new(storage),
            page_delay: settings.page_delay(),
            settings: settings.clone(),
        })
    }

    /// 爬取一个分类的前 `pages` 页并写出报告
    ///
    /// 网络失败只会让对应的行或页为空；存储错误向上返回
    #[instrument(skip(self))]
    pub async fn crawl_kingdom(
        &self,
        kingdom: &str,
        pages: usize,
    ) -> Result<KingdomOutcome, CrawlUseCaseError> {
        info!("[{}] crawling {} page(s)", kingdom, pages);
        let description = self.listing.kingdom_description(kingdom).await;

        let mut vulnerabilities = Vec::new();
        for page_index in 0..pages {
            for stub in self.listing.list_page(kingdom, page_index).await {
                let detail = self.detail.fetch_detail(&stub.detail_link).await;
                vulnerabilities.push(Vulnerability::merge(stub, detail));
            }
            if !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }
        }

        if vulnerabilities.is_empty() {
            warn!("[{}] no vulnerabilities collected, nothing written", kingdom);
            return Ok(KingdomOutcome {
                kingdom: kingdom.to_string(),
                pages,
                vulnerability_count: 0,
                files: None,
            });
        }

        let report = CategoryReport::new(kingdom, description, vulnerabilities)
            .with_layout(self.settings.crawler.detail_layout)
            .with_scraped_fields(self.settings.crawler.include_scraped_fields);
        let files = self.reports.write_report(&report).await?;

        Ok(KingdomOutcome {
            kingdom: kingdom.to_string(),
            pages,
            vulnerability_count: report.count(),
            files: Some(files),
        })
    }

    /// 按内置分类列表依次爬取，每个分类的页数自动确定
    pub async fn crawl_all(&self) -> Result<Vec<KingdomOutcome>, CrawlUseCaseError> {
        let mut outcomes = Vec::with_capacity(KINGDOMS.len());
        for kingdom in KINGDOMS {
            let pages = self
                .listing
                .page_count(
                    kingdom,
                    self.settings.crawler.page_strategy,
                    self.settings.fixed_page_count(kingdom),
                    self.settings.crawler.max_probe_pages,
                )
                .await;
            outcomes.push(self.crawl_kingdom(kingdom, pages).await?);
        }

        let total: usize = outcomes.iter().map(|o| o.vulnerability_count).sum();
        info!("crawled {} kingdoms, {} vulnerabilities", outcomes.len(), total);
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::PageTableEntry;
    use crate::engines::reqwest_engine::ReqwestEngine;
    use crate::infrastructure::storage::InMemoryStorage;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing_page(rows: &[(&str, &str)]) -> String {
        let rows: String = rows
            .iter()
            .map(|(id, title)| {
                format!(
                    r#"<div class="weaknessCell" data-id="{id}"><h1>{title}</h1>
                       <a class="external-link" href="/ko/detail/{id}">more</a></div>"#
                )
            })
            .collect();
        format!(r#"<html><body><div class="panel"><p>Kingdom text</p></div>{rows}</body></html>"#)
    }

    const DETAIL: &str = r#"
        <ul class="nav-tabs"><li><a>Java</a></li></ul>
        <div class="sub-title">Abstract</div><div class="t">abs</div>
    "#;

    fn settings(server: &MockServer) -> Settings {
        let mut settings = Settings::from_defaults().unwrap();
        settings.site.base_url = server.uri();
        settings.crawler.page_delay_ms = 0;
        settings
    }

    fn use_case(settings: &Settings, storage: Arc<InMemoryStorage>) -> CrawlUseCase {
        CrawlUseCase::new(
            settings,
            Arc::new(ReqwestEngine::new("vulncrawl-test").unwrap()),
            storage,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_crawl_kingdom_merges_details_and_writes_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ko/weakness"))
            .and(query_param("po", "1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(listing_page(&[("3", "Third")])),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ko/weakness"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&[
                ("1", "First"),
                ("2", "Second"),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/ko/detail/2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL))
            .mount(&server)
            .await;

        let storage = Arc::new(InMemoryStorage::new());
        let outcome = use_case(&settings(&server), storage.clone())
            .crawl_kingdom("API Abuse", 2)
            .await
            .unwrap();

        assert_eq!(outcome.vulnerability_count, 3);
        let files = outcome.files.unwrap();
        assert_eq!(files.xml_key, "xml/API_Abuse.xml");

        let xml = storage.get_string("xml/API_Abuse.xml").await.unwrap();
        assert!(xml.contains("<description>Kingdom text</description>"));
        assert!(xml.contains("<title>Third</title>"));

        let json: serde_json::Value =
            serde_json::from_str(&storage.get_string("json/API_Abuse.json").await.unwrap())
                .unwrap();
        let records = json["fortify_report"]["vulnerabilities"]["vulnerability"]
            .as_array()
            .unwrap();
        assert_eq!(records[0]["languages"]["language"], "Java");
        assert_eq!(records[0]["abstract"], "abs");
        assert_eq!(records[1]["languages"], serde_json::Value::Null);
        assert_eq!(records[2]["title"], "Third");
    }

    #[tokio::test]
    async fn test_empty_kingdom_writes_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let storage = Arc::new(InMemoryStorage::new());
        let outcome = use_case(&settings(&server), storage.clone())
            .crawl_kingdom("Errors", 1)
            .await
            .unwrap();

        assert_eq!(outcome.files, None);
        assert!(!storage.exists("xml").await.unwrap());
    }

    #[tokio::test]
    async fn test_crawl_all_uses_page_table() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ko/weakness"))
            .and(query_param("kingdom", "Errors"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(listing_page(&[("9", "Nine")])),
            )
            .expect(4)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL))
            .mount(&server)
            .await;

        let mut settings = settings(&server);
        settings.crawler.page_table = vec![PageTableEntry {
            kingdom: "Errors".to_string(),
            pages: 3,
        }];

        let outcomes = use_case(&settings, Arc::new(InMemoryStorage::new()))
            .crawl_all()
            .await
            .unwrap();
        let errors = outcomes.iter().find(|o| o.kingdom == "Errors").unwrap();
        assert_eq!(errors.pages, 3);
        assert_eq!(errors.vulnerability_count, 3);
    }
}
