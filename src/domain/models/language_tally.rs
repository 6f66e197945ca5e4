// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use crate::utils::xml_tree::XmlElement;

/// 语言统计
///
/// 语言 → 分类 → 漏洞数，以及语言 → 完整漏洞记录列表。
/// 键已经过归一化（`/` 与空格换成 `_`），并按字典序输出
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageTally {
    counts: BTreeMap<String, BTreeMap<String, u64>>,
    details: BTreeMap<String, Vec<Value>>,
}

impl LanguageTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一条漏洞在某语言、某分类下出现一次
    pub fn record(&mut self, language: &str, kingdom: &str, vulnerability: &Value) {
        *self
            .counts
            .entry(language.to_string())
            .or_default()
            .entry(kingdom.to_string())
            .or_insert(0) += 1;
        self.details
            .entry(language.to_string())
            .or_default()
            .push(vulnerability.clone());
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn language_count(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, language: &str, kingdom: &str) -> u64 {
        self.counts
            .get(language)
            .and_then(|kingdoms| kingdoms.get(kingdom))
            .copied()
            .unwrap_or(0)
    }

    pub fn details(&self, language: &str) -> &[Value] {
        self.details.get(language).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `{"by_language": {language: {kingdom: count}}}`
    pub fn summary_json(&self) -> Value {
        let by_language: Map<String, Value> = self
            .counts
            .iter()
            .map(|(language, kingdoms)| {
                let kingdoms: Map<String, Value> = kingdoms
                    .iter()
                    .map(|(kingdom, count)| (kingdom.clone(), json!(count)))
                    .collect();
                (language.clone(), Value::Object(kingdoms))
            })
            .collect();
        json!({ "by_language": by_language })
    }

    /// `analysis/by_language/language[@name]/kingdom[@name]`，数量作为文本
    pub fn summary_xml(&self) -> XmlElement {
        let mut by_language = XmlElement::new("by_language");
        for (language, kingdoms) in &self.counts {
            let mut language_el = XmlElement::new("language").with_attribute("name", language);
            for (kingdom, count) in kingdoms {
                language_el.push_child(
                    XmlElement::new("kingdom")
                        .with_attribute("name", kingdom)
                        .with_text(count.to_string()),
                );
            }
            by_language.push_child(language_el);
        }
        XmlElement::new("analysis").with_child(by_language)
    }

    /// `{"by_language": {language: [vulnerability, ...]}}`
    pub fn detail_json(&self) -> Value {
        let by_language: Map<String, Value> = self
            .details
            .iter()
            .map(|(language, records)| (language.clone(), Value::Array(records.clone())))
            .collect();
        json!({ "by_language": by_language })
    }
}
