// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::config::markup::{MarkupOverrides, MarkupProfile, SiteMarkup};
use crate::domain::models::vulnerability::DetailLayout;

/// 默认站点地址
pub const DEFAULT_BASE_URL: &str = "https://vulncat.fortify.com";

/// 应用程序配置设置
///
/// 包含目标站点、爬取行为和页面标记三部分配置
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 目标站点配置
    pub site: SiteSettings,
    /// 爬取行为配置
    pub crawler: CrawlerSettings,
    /// 页面标记（CSS选择器）配置
    pub markup: MarkupSettings,
}

/// 目标站点配置
#[derive(Debug, Clone, Deserialize)]
pub struct SiteSettings {
    /// 站点根地址，详情链接基于它解析为绝对地址
    pub base_url: String,
    /// 语言路径段，例如 `ko` 或 `en`
    pub locale: String,
    /// 请求使用的 User-Agent
    pub user_agent: String,
}

/// 页数获取策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStrategy {
    /// 读取分页控件的最后一页链接
    Pagination,
    /// 逐页探测，直到某页没有列表行
    Probe,
}

/// 固定页数表条目
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageTableEntry {
    pub kingdom: String,
    pub pages: usize,
}

/// 爬取行为配置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// 单次请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 每个列表页处理完后的等待时间（毫秒）
    pub page_delay_ms: u64,
    /// 详情字段在报告中的布局
    pub detail_layout: DetailLayout,
    /// 是否在 info 中输出 scraped_fields
    pub include_scraped_fields: bool,
    /// 页数获取策略
    pub page_strategy: PageStrategy,
    /// 探测策略的最大页数
    pub max_probe_pages: usize,
    /// 固定页数表，优先于自动发现
    #[serde(default)]
    pub page_table: Vec<PageTableEntry>,
}

/// 页面标记配置
#[derive(Debug, Clone, Deserialize)]
pub struct MarkupSettings {
    /// 选择器预设
    pub profile: MarkupProfile,
    /// 单个选择器覆盖
    #[serde(flatten)]
    pub overrides: MarkupOverrides,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 以及 `VULNCRAWL__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载并校验的配置
    /// * `Err(ConfigError)` - 配置加载或校验失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("VULNCRAWL").separator("__"));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// 仅使用内置默认值构建配置
    pub fn from_defaults() -> Result<Self, ConfigError> {
        let settings: Settings = Self::defaults()?.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Site defaults
            .set_default("site.base_url", DEFAULT_BASE_URL)?
            .set_default("site.locale", "ko")?
            .set_default(
                "site.user_agent",
                "Mozilla/5.0 (compatible; vulncrawl/0.1; +https://github.com/Kirky-X)",
            )?
            // Crawler defaults
            .set_default("crawler.request_timeout_secs", 15)?
            .set_default("crawler.page_delay_ms", 500)?
            .set_default("crawler.detail_layout", "flat")?
            .set_default("crawler.include_scraped_fields", false)?
            .set_default("crawler.page_strategy", "pagination")?
            .set_default("crawler.max_probe_pages", 200)?
            // Markup defaults
            .set_default("markup.profile", "weakness")
    }

    /// 校验站点地址与选择器
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        self.site_markup()
            .compile()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        if self.crawler.max_probe_pages == 0 {
            return Err(ConfigError::Message(
                "crawler.max_probe_pages must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// 解析站点根地址
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.site.base_url).map_err(|e| {
            ConfigError::Message(format!("invalid site.base_url {}: {}", self.site.base_url, e))
        })
    }

    /// 分类列表页地址：`{base_url}/{locale}/weakness`
    pub fn listing_url(&self) -> Result<Url, ConfigError> {
        let path = format!("{}/weakness", self.site.locale.trim_matches('/'));
        self.base_url()?
            .join(&path)
            .map_err(|e| ConfigError::Message(format!("invalid listing path {}: {}", path, e)))
    }

    /// 预设与覆盖合并后的页面标记
    pub fn site_markup(&self) -> SiteMarkup {
        self.markup.profile.markup().with_overrides(&self.markup.overrides)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.crawler.page_delay_ms)
    }

    /// 查询固定页数表
    pub fn fixed_page_count(&self, kingdom: &str) -> Option<usize> {
        self.crawler
            .page_table
            .iter()
            .find(|entry| entry.kingdom == kingdom)
            .map(|entry| entry.pages)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
