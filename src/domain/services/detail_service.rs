// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{ElementRef, Html};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::config::markup::MarkupSelectors;
use crate::domain::models::vulnerability::VulnerabilityDetail;
use crate::engines::traits::{FetchRequest, PageFetcher};
use crate::utils::text_processing::{element_text, truncate_text};
use crate::utils::url_utils::is_http_url;

/// 详情页中摘要小节的标题
pub const ABSTRACT_SECTION: &str = "Abstract";
/// 详情页中说明小节的标题
pub const EXPLANATION_SECTION: &str = "Explanation";

/// 漏洞详情服务
///
/// 获取详情页并提取语言标签与 Abstract/Explanation 小节。
/// 任何失败都返回默认（空）详情，调用方无需中断批处理
pub struct DetailService {
    fetcher: Arc<dyn PageFetcher>,
    markup: Arc<MarkupSelectors>,
    timeout: Duration,
}

impl DetailService {
    pub fn new(fetcher: Arc<dyn PageFetcher>, markup: Arc<MarkupSelectors>, timeout: Duration) -> Self {
        Self {
            fetcher,
            markup,
            timeout,
        }
    }

    /// 获取并解析一个详情页
    #[instrument(skip(self))]
    pub async fn fetch_detail(&self, detail_url: &str) -> VulnerabilityDetail {
        if !is_http_url(detail_url) {
            warn!("skipping non-http detail link: {}", detail_url);
            return VulnerabilityDetail::default();
        }

        info!("scraping detail page: {}", detail_url);
        let request = FetchRequest::new(detail_url, self.timeout);
        match self.fetcher.fetch(&request).await {
            Ok(response) => {
                let detail = parse_detail(&response.content, &self.markup);
                debug!(
                    status = response.status_code,
                    elapsed_ms = response.response_time_ms,
                    url = %response.final_url,
                    languages = detail.languages.len(),
                    has_abstract = !detail.abstract_text.is_empty(),
                    has_explanation = !detail.explanation.is_empty(),
                    abstract_preview = %truncate_text(&detail.abstract_text, 60),
                    "detail parsed"
                );
                detail
            }
            Err(e) => {
                error!(timeout = e.is_timeout(), "detail request failed: {}: {}", detail_url, e);
                VulnerabilityDetail::default()
            }
        }
    }
}

/// 从详情页 HTML 中提取详情字段，缺失的部分为空
pub fn parse_detail(html: &str, markup: &MarkupSelectors) -> VulnerabilityDetail {
    let document = Html::parse_document(html);

    let languages = document
        .select(&markup.language_tab)
        .map(element_text)
        .filter(|label| !label.is_empty())
        .collect();

    VulnerabilityDetail {
        languages,
        abstract_text: section_text(&document, markup, ABSTRACT_SECTION).unwrap_or_default(),
        explanation: section_text(&document, markup, EXPLANATION_SECTION).unwrap_or_default(),
    }
}

/// 找到文本等于 `section` 的小节标题，返回其后第一个匹配正文选择器的同级元素的文本
fn section_text(document: &Html, markup: &MarkupSelectors, section: &str) -> Option<String> {
    let title = document
        .select(&markup.section_title)
        .find(|title| element_text(*title) == section)?;

    let body = title
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| markup.section_body.matches(sibling))?;

    Some(element_text(body))
}
