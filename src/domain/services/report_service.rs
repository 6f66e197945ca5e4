// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::domain::models::report::CategoryReport;
use crate::domain::models::vulnerability::{FieldValue, Vulnerability};
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::utils::errors::ReportError;
use crate::utils::xml_folding::xml_to_json;
use crate::utils::xml_tree::XmlElement;

/// 报告根元素
pub const REPORT_ROOT: &str = "fortify_report";

/// 已写出的报告文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub xml_key: String,
    /// XML 转 JSON 失败时为 None
    pub json_key: Option<String>,
}

/// 列表字段中每一项的元素名：去掉父元素名末尾的 `s`，否则为 `item`
pub fn list_item_tag(parent: &str) -> String {
    match parent.strip_suffix('s') {
        Some(singular) if !singular.is_empty() => singular.to_string(),
        _ => "item".to_string(),
    }
}

/// 将一个字段转换为 XML 元素，映射字段递归展开
pub fn field_element(name: &str, value: &FieldValue) -> XmlElement {
    match value {
        FieldValue::Text(text) => XmlElement::new(name).with_text(text.as_str()),
        FieldValue::List(items) => {
            let tag = list_item_tag(name);
            items.iter().fold(XmlElement::new(name), |parent, item| {
                parent.with_child(XmlElement::new(tag.as_str()).with_text(item.as_str()))
            })
        }
        FieldValue::Map(entries) => entries
            .iter()
            .fold(XmlElement::new(name), |parent, (key, value)| {
                parent.with_child(field_element(key, value))
            }),
    }
}

/// 构建报告的 XML 树
///
/// ```text
/// fortify_report
/// ├── info { kingdom, description, vulnerability_count, generated_at [, scraped_fields] }
/// └── vulnerabilities
///     └── vulnerability × N
/// ```
pub fn build_report_tree(report: &CategoryReport) -> XmlElement {
    let mut info = XmlElement::new("info")
        .with_child(XmlElement::new("kingdom").with_text(report.kingdom.as_str()))
        .with_child(XmlElement::new("description").with_text(report.description.as_str()))
        .with_child(
            XmlElement::new("vulnerability_count").with_text(report.count().to_string()),
        )
        .with_child(XmlElement::new("generated_at").with_text(report.generated_at_string()));

    if report.include_scraped_fields {
        info.push_child(field_element(
            "scraped_fields",
            &FieldValue::List(Vulnerability::field_names(report.layout)),
        ));
    }

    let vulnerabilities = report
        .vulnerabilities
        .iter()
        .fold(XmlElement::new("vulnerabilities"), |parent, vulnerability| {
            let element = vulnerability
                .fields(report.layout)
                .iter()
                .fold(XmlElement::new("vulnerability"), |el, (name, value)| {
                    el.with_child(field_element(name, value))
                });
            parent.with_child(element)
        });

    XmlElement::new(REPORT_ROOT)
        .with_child(info)
        .with_child(vulnerabilities)
}

/// 渲染报告 XML 文本
pub fn render_report_xml(report: &CategoryReport) -> Result<String, ReportError> {
    Ok(build_report_tree(report).to_pretty_xml()?)
}

/// 报告写出服务
///
/// 先写 `xml/<分类>.xml`，再把该文件折叠为 `json/<分类>.json`
pub struct ReportService {
    storage: Arc<dyn StorageRepository>,
}

impl ReportService {
    pub fn new(storage: Arc<dyn StorageRepository>) -> Self {
        Self { storage }
    }

    /// 写出一个分类报告
    ///
    /// 存储错误向上返回；XML→JSON 转换失败只记录日志，`json_key` 为 None
    #[instrument(skip(self, report), fields(kingdom = %report.kingdom, count = report.count()))]
    pub async fn write_report(&self, report: &CategoryReport) -> Result<ReportFiles, ReportError> {
        info!("[{}] saving {} vulnerabilities", report.kingdom, report.count());

        let xml_key = report.xml_key();
        let xml = render_report_xml(report)?;
        self.storage.save(&xml_key, xml.as_bytes()).await?;
        info!("saved {}", xml_key);

        let json_key = report.json_key();
        let converted = self.convert_xml_to_json(&xml_key, &json_key).await?;

        Ok(ReportFiles {
            xml_key,
            json_key: converted.then_some(json_key),
        })
    }

    /// 读取 XML 文件并以折叠规则写出 JSON 文件
    ///
    /// 返回是否成功转换；解析失败只中止这一个文件
    pub async fn convert_xml_to_json(&self, xml_key: &str, json_key: &str) -> Result<bool, ReportError> {
        let Some(bytes) = self.storage.get(xml_key).await? else {
            error!("XML file not found for conversion: {}", xml_key);
            return Ok(false);
        };

        let xml = match String::from_utf8(bytes) {
            Ok(xml) => xml,
            Err(e) => {
                error!("JSON conversion failed for {}: {}", xml_key, ReportError::Encoding(e.to_string()));
                return Ok(false);
            }
        };

        let value = match xml_to_json(&xml) {
            Ok(value) => value,
            Err(e) => {
                error!("JSON conversion failed for {}: {}", xml_key, e);
                return Ok(false);
            }
        };

        let mut json = serde_json::to_string_pretty(&value)?;
        json.push('\n');
        self.storage.save(json_key, json.as_bytes()).await?;
        info!("converted {} to {}", xml_key, json_key);
        Ok(true)
    }
}

#[cfg(test)]
#[path = "report_service_test.rs"]
mod tests;
