// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! XML → JSON 折叠
//!
//! 与具体 schema 无关的结构转换：
//! - 无子元素且无属性的元素折叠为去除首尾空白的文本，空文本为 `null`
//! - 有子元素的元素折叠为 `子标签 → 子值` 的映射，重复的同级标签按文档顺序合并为数组
//! - 属性以 `@` 前缀的键写入映射
//! - 与属性或子元素并存的非空文本写入 `#text`

use serde_json::{Map, Value};

use crate::utils::xml_tree::{XmlElement, XmlTreeError};

/// 折叠整个文档：`{根标签: 折叠后的根}`
pub fn fold_document(root: &XmlElement) -> Value {
    let mut document = Map::new();
    document.insert(root.name.clone(), fold_element(root));
    Value::Object(document)
}

/// 折叠单个元素
pub fn fold_element(element: &XmlElement) -> Value {
    let text = element.text_or_empty().trim();

    if element.children.is_empty() && element.attributes.is_empty() {
        return if text.is_empty() {
            Value::Null
        } else {
            Value::String(text.to_string())
        };
    }

    let mut map = Map::new();
    for child in &element.children {
        let value = fold_element(child);
        match map.get_mut(&child.name) {
            // 折叠结果本身不会是数组，出现数组说明已经合并过
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(child.name.clone(), value);
            }
        }
    }

    for (key, value) in &element.attributes {
        map.insert(format!("@{}", key), Value::String(value.clone()));
    }

    if !text.is_empty() {
        map.insert("#text".to_string(), Value::String(text.to_string()));
    }

    Value::Object(map)
}

/// 解析 XML 文本并折叠为 JSON 值
pub fn xml_to_json(xml: &str) -> Result<Value, XmlTreeError> {
    let root = XmlElement::parse(xml)?;
    Ok(fold_document(&root))
}
