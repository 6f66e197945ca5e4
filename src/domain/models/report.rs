// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::models::kingdom::file_stem;
use crate::domain::models::vulnerability::{DetailLayout, Vulnerability};

/// 分类报告
///
/// 每个分类写一次：一个 XML 文件及其 JSON 派生文件
#[derive(Debug, Clone)]
pub struct CategoryReport {
    /// 分类名称
    pub kingdom: String,
    /// 分类描述
    pub description: String,
    /// 生成时间
    pub generated_at: DateTime<Utc>,
    /// 详情字段布局
    pub layout: DetailLayout,
    /// 是否在 info 中列出字段名
    pub include_scraped_fields: bool,
    /// 漏洞记录，保持爬取顺序
    pub vulnerabilities: Vec<Vulnerability>,
}

impl CategoryReport {
    pub fn new(
        kingdom: impl Into<String>,
        description: impl Into<String>,
        vulnerabilities: Vec<Vulnerability>,
    ) -> Self {
        Self {
            kingdom: kingdom.into(),
            description: description.into(),
            generated_at: Utc::now(),
            layout: DetailLayout::default(),
            include_scraped_fields: false,
            vulnerabilities,
        }
    }

    pub fn with_layout(mut self, layout: DetailLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_scraped_fields(mut self, include: bool) -> Self {
        self.include_scraped_fields = include;
        self
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn count(&self) -> usize {
        self.vulnerabilities.len()
    }

    pub fn file_stem(&self) -> String {
        file_stem(&self.kingdom)
    }

    pub fn generated_at_string(&self) -> String {
        self.generated_at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// 报告文件的存储键
    pub fn xml_key(&self) -> String {
        format!("xml/{}.xml", self.file_stem())
    }

    pub fn json_key(&self) -> String {
        format!("json/{}.json", self.file_stem())
    }
}
