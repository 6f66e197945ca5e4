// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 详情字段在报告中的布局
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLayout {
    /// `abstract` 与 `explanation` 作为记录的直接字段
    #[default]
    Flat,
    /// 嵌套为 `description.Abstract` 与 `description.Explanation`
    Nested,
}

/// 漏洞存根
///
/// 从分类列表页的一行中提取，之后保持不变，只与详情字段合并
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityStub {
    /// 站点内部编号（列表行上的属性值）
    pub numeric_id: String,
    /// 标题
    pub title: String,
    /// 详情页绝对地址
    pub detail_link: String,
    /// 所属分类
    pub kingdom: String,
}

/// 漏洞详情
///
/// 从详情页提取，缺失的字段为空
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VulnerabilityDetail {
    /// 支持的语言，保持页面顺序
    pub languages: Vec<String>,
    /// Abstract 小节
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Explanation 小节
    pub explanation: String,
}

/// 报告字段值
///
/// 标量写成文本元素，列表写成带子元素的父元素，映射可任意嵌套
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Map(Vec<(String, FieldValue)>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }
}

/// 漏洞记录：存根与详情的合并结果，也是输出的基本单位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vulnerability {
    pub stub: VulnerabilityStub,
    pub detail: VulnerabilityDetail,
}

impl Vulnerability {
    pub fn merge(stub: VulnerabilityStub, detail: VulnerabilityDetail) -> Self {
        Self { stub, detail }
    }

    /// 按输出顺序展开为命名字段
    pub fn fields(&self, layout: DetailLayout) -> Vec<(String, FieldValue)> {
        let mut fields = vec![
            ("numeric_id".to_string(), FieldValue::text(&self.stub.numeric_id)),
            ("title".to_string(), FieldValue::text(&self.stub.title)),
            ("detail_link".to_string(), FieldValue::text(&self.stub.detail_link)),
            ("kingdom".to_string(), FieldValue::text(&self.stub.kingdom)),
            (
                "languages".to_string(),
                FieldValue::List(self.detail.languages.clone()),
            ),
        ];

        match layout {
            DetailLayout::Flat => {
                fields.push((
                    "abstract".to_string(),
                    FieldValue::text(&self.detail.abstract_text),
                ));
                fields.push((
                    "explanation".to_string(),
                    FieldValue::text(&self.detail.explanation),
                ));
            }
            DetailLayout::Nested => {
                fields.push((
                    "description".to_string(),
                    FieldValue::Map(vec![
                        (
                            "Abstract".to_string(),
                            FieldValue::text(&self.detail.abstract_text),
                        ),
                        (
                            "Explanation".to_string(),
                            FieldValue::text(&self.detail.explanation),
                        ),
                    ]),
                ));
            }
        }

        fields
    }

    /// 字段名列表，用于 info 中的 scraped_fields
    pub fn field_names(layout: DetailLayout) -> Vec<String> {
        let sample = Vulnerability::merge(
            VulnerabilityStub {
                numeric_id: String::new(),
                title: String::new(),
                detail_link: String::new(),
                kingdom: String::new(),
            },
            VulnerabilityDetail::default(),
        );
        sample.fields(layout).into_iter().map(|(name, _)| name).collect()
    }
}
