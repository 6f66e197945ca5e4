// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::domain::models::kingdom::normalize_key;
use crate::domain::models::language_tally::LanguageTally;
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::utils::errors::AnalysisError;

/// 分类 JSON 文件所在目录
pub const JSON_DIR: &str = "json";
/// 语言汇总 JSON
pub const SUMMARY_JSON_KEY: &str = "analysis/summary_by_language.json";
/// 语言汇总 XML
pub const SUMMARY_XML_KEY: &str = "analysis/summary_by_language.xml";
/// 按语言分组的完整记录
pub const DETAIL_JSON_KEY: &str = "analysis/detail_by_language/detail_by_language.json";

/// `.json` 文件（扩展名不区分大小写）的文件名主干
pub fn json_file_stem(file_name: &str) -> Option<&str> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    (!stem.is_empty() && extension.eq_ignore_ascii_case("json")).then_some(stem)
}

/// 取出报告中的漏洞记录，单个对象视为只有一条记录
pub fn records_from_document(document: &Value) -> Vec<&Value> {
    match document.pointer("/fortify_report/vulnerabilities/vulnerability") {
        Some(Value::Array(records)) => records.iter().collect(),
        Some(record @ Value::Object(_)) => vec![record],
        _ => Vec::new(),
    }
}

/// 取出一条记录的语言列表
///
/// `languages` 下的子元素名可能是 `language` 或 `item`，值可能是字符串或数组
pub fn languages_of(record: &Value) -> Vec<String> {
    let Some(languages) = record.get("languages").filter(|v| v.is_object()) else {
        return Vec::new();
    };
    let value = languages.get("language").or_else(|| languages.get("item"));

    match value {
        Some(Value::String(language)) => vec![language.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// 语言统计服务
///
/// 读取 `json/` 下所有分类文件，统计每种语言在各分类中的漏洞数
pub struct LanguageAnalyzer {
    storage: Arc<dyn StorageRepository>,
}

impl LanguageAnalyzer {
    pub fn new(storage: Arc<dyn StorageRepository>) -> Self {
        Self { storage }
    }

    /// 汇总所有分类文件
    ///
    /// 单个文件格式错误只跳过该文件；`json/` 不存在时返回 None
    #[instrument(skip(self))]
    pub async fn tally(&self) -> Result<Option<LanguageTally>, AnalysisError> {
        if !self.storage.exists(JSON_DIR).await? {
            error!("JSON directory not found: {}", JSON_DIR);
            return Ok(None);
        }

        let mut tally = LanguageTally::new();
        for key in self.storage.list(JSON_DIR).await? {
            let Some(stem) = key
                .strip_prefix(&format!("{}/", JSON_DIR))
                .and_then(json_file_stem)
            else {
                continue;
            };
            let kingdom = normalize_key(stem);

            let Some(bytes) = self.storage.get(&key).await? else {
                continue;
            };
            let document: Value = match serde_json::from_slice(&bytes) {
                Ok(document) => document,
                Err(e) => {
                    error!("skipping malformed JSON {}: {}", key, e);
                    continue;
                }
            };

            let records = records_from_document(&document);
            if records.is_empty() {
                warn!("no vulnerabilities in {}", key);
            }
            for record in records {
                for language in languages_of(record) {
                    tally.record(&normalize_key(&language), &kingdom, record);
                }
            }
            info!("processed {}", key);
        }

        Ok(Some(tally))
    }

    /// 统计并写出三个分析文件
    pub async fn analyze(&self) -> Result<Option<LanguageTally>, AnalysisError> {
        let Some(tally) = self.tally().await? else {
            return Ok(None);
        };

        self.save_json(SUMMARY_JSON_KEY, &tally.summary_json()).await?;
        let xml = tally.summary_xml().to_pretty_xml()?;
        self.storage.save(SUMMARY_XML_KEY, xml.as_bytes()).await?;
        info!("saved {}", SUMMARY_XML_KEY);
        self.save_json(DETAIL_JSON_KEY, &tally.detail_json()).await?;

        info!("analysis finished: {} language(s)", tally.language_count());
        Ok(Some(tally))
    }

    async fn save_json(&self, key: &str, value: &Value) -> Result<(), AnalysisError> {
        let mut json = serde_json::to_string_pretty(value)?;
        json.push('\n');
        self.storage.save(key, json.as_bytes()).await?;
        info!("saved {}", key);
        Ok(())
    }
}
