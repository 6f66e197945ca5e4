// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::config::markup::MarkupSelectors;
use crate::config::settings::PageStrategy;
use crate::domain::models::vulnerability::VulnerabilityStub;
use crate::engines::traits::{FetchRequest, PageFetcher};
use crate::utils::text_processing::element_text;
use crate::utils::url_utils::{query_param, resolve_url};

/// 找不到分类描述时使用的文本
pub const DESCRIPTION_NOT_FOUND: &str = "Category description not found.";
/// 获取分类描述失败时使用的文本
pub const DESCRIPTION_ERROR: &str = "Error scraping category description.";

/// 分类列表服务
///
/// 按分类名和页码获取列表页，提取每一行的漏洞存根；
/// 网络失败或页面结构不符时返回空结果并记录日志，不向上抛错
pub struct ListingService {
    fetcher: Arc<dyn PageFetcher>,
    markup: Arc<MarkupSelectors>,
    base_url: Url,
    listing_url: Url,
    timeout: Duration,
}

impl ListingService {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        markup: Arc<MarkupSelectors>,
        base_url: Url,
        listing_url: Url,
        timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            markup,
            base_url,
            listing_url,
            timeout,
        }
    }

    fn listing_request(&self, kingdom: &str, page_index: Option<usize>) -> FetchRequest {
        let request = FetchRequest::new(self.listing_url.as_str(), self.timeout)
            .with_query("kingdom", kingdom);
        match page_index {
            Some(page) => request.with_query(self.markup.page_param.as_str(), page.to_string()),
            None => request,
        }
    }

    /// 获取列表页 HTML，失败时记录日志并返回 None
    async fn fetch_listing(&self, kingdom: &str, page_index: Option<usize>) -> Option<String> {
        let request = self.listing_request(kingdom, page_index);
        match self.fetcher.fetch(&request).await {
            Ok(response) => {
                debug!(
                    status = response.status_code,
                    elapsed_ms = response.response_time_ms,
                    url = %response.final_url,
                    "listing page fetched"
                );
                Some(response.content)
            }
            Err(e) => {
                error!(
                    kingdom,
                    ?page_index,
                    url = %request.url,
                    timeout = e.is_timeout(),
                    "listing request failed: {}",
                    e
                );
                None
            }
        }
    }

    /// 获取一页列表并提取漏洞存根
    ///
    /// # 参数
    ///
    /// * `kingdom` - 分类名称
    /// * `page_index` - 从 0 开始的页码
    #[instrument(skip(self), fields(engine = self.fetcher.name()))]
    pub async fn list_page(&self, kingdom: &str, page_index: usize) -> Vec<VulnerabilityStub> {
        info!("[{}] scraping listing page {}", kingdom, page_index);
        let Some(html) = self.fetch_listing(kingdom, Some(page_index)).await else {
            return Vec::new();
        };

        let stubs = parse_listing(&html, kingdom, &self.base_url, &self.markup);
        if stubs.is_empty() {
            warn!("[{}] no listing rows on page {}", kingdom, page_index);
        } else {
            debug!("[{}] page {} has {} rows", kingdom, page_index, stubs.len());
        }
        stubs
    }

    /// 获取分类描述文本
    #[instrument(skip(self))]
    pub async fn kingdom_description(&self, kingdom: &str) -> String {
        info!("[{}] scraping kingdom description", kingdom);
        match self.fetch_listing(kingdom, None).await {
            Some(html) => parse_description(&html, &self.markup)
                .unwrap_or_else(|| DESCRIPTION_NOT_FOUND.to_string()),
            None => DESCRIPTION_ERROR.to_string(),
        }
    }

    /// 读取分页控件确定页数，控件缺失时为 1 页
    #[instrument(skip(self))]
    pub async fn discover_page_count(&self, kingdom: &str) -> usize {
        let pages = match self.fetch_listing(kingdom, Some(0)).await {
            Some(html) => parse_page_count(&html, &self.base_url, &self.markup).unwrap_or(1),
            None => 1,
        };
        info!("[{}] pagination reports {} page(s)", kingdom, pages);
        pages
    }

    /// 某页是否存在列表行
    pub async fn page_has_rows(&self, kingdom: &str, page_index: usize) -> bool {
        match self.fetch_listing(kingdom, Some(page_index)).await {
            Some(html) => has_listing_rows(&html, &self.markup),
            None => false,
        }
    }

    /// 从第 1 页开始逐页探测，直到某页没有列表行或达到上限
    #[instrument(skip(self))]
    pub async fn probe_page_count(&self, kingdom: &str, max_pages: usize) -> usize {
        let mut pages = 1;
        while pages < max_pages && self.page_has_rows(kingdom, pages).await {
            pages += 1;
        }
        info!("[{}] probing found {} page(s)", kingdom, pages);
        pages
    }

    /// 按策略确定页数，固定页数表优先
    pub async fn page_count(
        &self,
        kingdom: &str,
        strategy: PageStrategy,
        fixed: Option<usize>,
        max_probe_pages: usize,
    ) -> usize {
        if let Some(pages) = fixed {
            info!("[{}] using fixed page count {}", kingdom, pages);
            return pages;
        }
        match strategy {
            PageStrategy::Pagination => self.discover_page_count(kingdom).await,
            PageStrategy::Probe => self.probe_page_count(kingdom, max_probe_pages).await,
        }
    }
}

/// 从列表页 HTML 中提取漏洞存根
///
/// 缺少标题或带 `href` 的链接的行被跳过，链接解析为绝对地址
pub fn parse_listing(
    html: &str,
    kingdom: &str,
    base_url: &Url,
    markup: &MarkupSelectors,
) -> Vec<VulnerabilityStub> {
    let document = Html::parse_document(html);
    let mut stubs = Vec::new();

    for row in document.select(&markup.listing_row) {
        let title = row.select(&markup.row_title).next().map(element_text);
        let href = row
            .select(&markup.row_link)
            .next()
            .and_then(|link| link.value().attr("href"));

        let (Some(title), Some(href)) = (title, href) else {
            continue;
        };

        let detail_link = match resolve_url(base_url, href.trim()) {
            Ok(url) => url.to_string(),
            Err(e) => {
                warn!("[{}] skipping row with invalid link {}: {}", kingdom, href, e);
                continue;
            }
        };

        stubs.push(VulnerabilityStub {
            numeric_id: row
                .value()
                .attr(&markup.row_id_attr)
                .unwrap_or_default()
                .to_string(),
            title,
            detail_link,
            kingdom: kingdom.to_string(),
        });
    }

    stubs
}

/// 提取分类描述段落
pub fn parse_description(html: &str, markup: &MarkupSelectors) -> Option<String> {
    let document = Html::parse_document(html);
    let description = document
        .select(&markup.kingdom_description)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty());
    description
}

/// 从分页控件读取总页数
///
/// 链接 `href` 中的分页参数是从 0 开始的页码；没有该参数时退回到数字标签（从 1 开始）
pub fn parse_page_count(html: &str, base_url: &Url, markup: &MarkupSelectors) -> Option<usize> {
    let document = Html::parse_document(html);
    let pages = document
        .select(&markup.pagination_link)
        .filter_map(|link| {
            let from_href = link
                .value()
                .attr("href")
                .and_then(|href| query_param(base_url, href, &markup.page_param))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .map(|index| index + 1);
            from_href.or_else(|| element_text(link).parse::<usize>().ok())
        })
        .max();
    pages.map(|pages| pages.max(1))
}

/// 页面是否含有列表行
pub fn has_listing_rows(html: &str, markup: &MarkupSelectors) -> bool {
    let document = Html::parse_document(html);
    let found = document.select(&markup.listing_row).next().is_some();
    found
}

#[cfg(test)]
#[path = "listing_service_test.rs"]
mod tests;
