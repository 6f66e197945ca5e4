// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::Selector;
use serde::Deserialize;
use thiserror::Error;

/// 选择器编译错误
#[derive(Error, Debug)]
#[error("invalid selector for markup.{field} ({selector}): {reason}")]
pub struct SelectorError {
    pub field: &'static str,
    pub selector: String,
    pub reason: String,
}

/// 站点标记预设
///
/// 同一站点的两个版本使用不同的分页参数名和列表选择器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkupProfile {
    /// 当前的 weakness 列表页（`.weaknessCell`，分页参数 `po`）
    Weakness,
    /// 旧版列表页（分页参数 `page`）
    ///
    /// 除分页参数外，这组选择器只是占位值，未对照真实页面核实，
    /// 使用时应按实际页面结构在 `[markup]` 中逐项覆盖
    Legacy,
}

impl MarkupProfile {
    pub fn markup(self) -> SiteMarkup {
        match self {
            MarkupProfile::Weakness => SiteMarkup {
                page_param: "po".to_string(),
                listing_row: ".weaknessCell".to_string(),
                row_title: "h1".to_string(),
                row_link: "a.external-link".to_string(),
                row_id_attr: "data-id".to_string(),
                kingdom_description: "div.panel p".to_string(),
                pagination_link: "ul.pagination a".to_string(),
                language_tab: "ul.nav-tabs a".to_string(),
                section_title: "div.sub-title".to_string(),
                section_body: "div.t".to_string(),
            },
            MarkupProfile::Legacy => SiteMarkup {
                page_param: "page".to_string(),
                listing_row: "div.weakness-item".to_string(),
                row_title: "h2".to_string(),
                row_link: "a.detail-link".to_string(),
                row_id_attr: "data-id".to_string(),
                kingdom_description: "div.kingdom-description p".to_string(),
                pagination_link: "div.pagination a".to_string(),
                language_tab: "ul.language-list a".to_string(),
                section_title: "h3.section-title".to_string(),
                section_body: "div.section-body".to_string(),
            },
        }
    }
}

/// 单个选择器覆盖，未设置的项沿用预设
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkupOverrides {
    pub page_param: Option<String>,
    pub listing_row: Option<String>,
    pub row_title: Option<String>,
    pub row_link: Option<String>,
    pub row_id_attr: Option<String>,
    pub kingdom_description: Option<String>,
    pub pagination_link: Option<String>,
    pub language_tab: Option<String>,
    pub section_title: Option<String>,
    pub section_body: Option<String>,
}

/// 站点页面标记（选择器源字符串）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMarkup {
    /// 分页查询参数名
    pub page_param: String,
    /// 列表行
    pub listing_row: String,
    /// 列表行内的标题
    pub row_title: String,
    /// 列表行内的详情链接
    pub row_link: String,
    /// 列表行上保存编号的属性
    pub row_id_attr: String,
    /// 分类描述段落
    pub kingdom_description: String,
    /// 分页控件中的链接
    pub pagination_link: String,
    /// 详情页语言标签
    pub language_tab: String,
    /// 详情页小节标题
    pub section_title: String,
    /// 详情页小节正文
    pub section_body: String,
}

impl SiteMarkup {
    pub fn with_overrides(mut self, overrides: &MarkupOverrides) -> Self {
        fn apply(target: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        apply(&mut self.page_param, &overrides.page_param);
        apply(&mut self.listing_row, &overrides.listing_row);
        apply(&mut self.row_title, &overrides.row_title);
        apply(&mut self.row_link, &overrides.row_link);
        apply(&mut self.row_id_attr, &overrides.row_id_attr);
        apply(&mut self.kingdom_description, &overrides.kingdom_description);
        apply(&mut self.pagination_link, &overrides.pagination_link);
        apply(&mut self.language_tab, &overrides.language_tab);
        apply(&mut self.section_title, &overrides.section_title);
        apply(&mut self.section_body, &overrides.section_body);
        self
    }

    /// 编译全部选择器
    pub fn compile(&self) -> Result<MarkupSelectors, SelectorError> {
        Ok(MarkupSelectors {
            page_param: self.page_param.clone(),
            row_id_attr: self.row_id_attr.clone(),
            listing_row: parse("listing_row", &self.listing_row)?,
            row_title: parse("row_title", &self.row_title)?,
            row_link: parse("row_link", &self.row_link)?,
            kingdom_description: parse("kingdom_description", &self.kingdom_description)?,
            pagination_link: parse("pagination_link", &self.pagination_link)?,
            language_tab: parse("language_tab", &self.language_tab)?,
            section_title: parse("section_title", &self.section_title)?,
            section_body: parse("section_body", &self.section_body)?,
        })
    }
}

fn parse(field: &'static str, selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|e| SelectorError {
        field,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// 编译后的页面标记
#[derive(Debug, Clone)]
pub struct MarkupSelectors {
    pub page_param: String,
    pub row_id_attr: String,
    pub listing_row: Selector,
    pub row_title: Selector,
    pub row_link: Selector,
    pub kingdom_description: Selector,
    pub pagination_link: Selector,
    pub language_tab: Selector,
    pub section_title: Selector,
    pub section_body: Selector,
}
