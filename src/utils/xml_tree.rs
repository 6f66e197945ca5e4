// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 轻量 XML 元素树
//!
//! 报告与统计结果先构建成 [`XmlElement`]，再用 quick-xml 以两个空格缩进写出；
//! 转换 JSON 时同样先把 XML 文件解析回这棵树。

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use thiserror::Error;

/// XML 树错误
#[derive(Error, Debug)]
pub enum XmlTreeError {
    #[error("XML parse error: {0}")]
    Parse(String),
    #[error("XML write error: {0}")]
    Write(String),
    #[error("XML document has no root element")]
    MissingRoot,
}

/// XML 元素
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    /// 属性，保持文档顺序
    pub attributes: Vec<(String, String)>,
    /// 元素自身的文本（各段去除首尾空白后拼接）
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// 第一个同名子元素
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// 以两个空格缩进、UTF-8 声明写出整个文档
    pub fn to_pretty_xml(&self) -> Result<String, XmlTreeError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(|e| XmlTreeError::Write(e.to_string()))?;
        write_element(&mut writer, self)?;

        let mut xml = String::from_utf8(writer.into_inner())
            .map_err(|e| XmlTreeError::Write(e.to_string()))?;
        xml.push('\n');
        Ok(xml)
    }

    /// 解析 XML 文档，返回根元素
    ///
    /// 注释、处理指令与声明被忽略，CDATA 按文本处理
    pub fn parse(xml: &str) -> Result<XmlElement, XmlTreeError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    stack.push(start_element(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    let element = start_element(&e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| XmlTreeError::Parse("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(e)) => {
                    let text = e
                        .unescape()
                        .map_err(|e| XmlTreeError::Parse(e.to_string()))?;
                    append_text(&mut stack, &text)?;
                }
                Ok(Event::CData(e)) => {
                    let raw = e.into_inner();
                    append_text(&mut stack, &String::from_utf8_lossy(&raw))?;
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    return Err(XmlTreeError::Parse(format!(
                        "{} at position {}",
                        e,
                        reader.error_position()
                    )))
                }
            }
        }

        if let Some(open) = stack.last() {
            return Err(XmlTreeError::Parse(format!(
                "unclosed element <{}>",
                open.name
            )));
        }
        root.ok_or(XmlTreeError::MissingRoot)
    }
}

/// XML 1.0 是否允许该字符
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

/// 去掉 XML 1.0 不允许出现的字符（多为抓取文本中的 C0 控制字符）
pub fn strip_invalid_xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect())
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &XmlElement,
) -> Result<(), XmlTreeError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), &*strip_invalid_xml_chars(value)));
    }

    let text = strip_invalid_xml_chars(element.text_or_empty());
    if element.children.is_empty() && text.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| XmlTreeError::Write(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| XmlTreeError::Write(e.to_string()))?;
    if !text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&text)))
            .map_err(|e| XmlTreeError::Write(e.to_string()))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| XmlTreeError::Write(e.to_string()))
}

fn start_element(start: &BytesStart<'_>) -> Result<XmlElement, XmlTreeError> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlTreeError::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).to_string();
        let value = attribute
            .unescape_value()
            .map_err(|e| XmlTreeError::Parse(e.to_string()))?
            .to_string();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), XmlTreeError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(XmlTreeError::Parse(format!(
            "multiple root elements, found <{}>",
            element.name
        ))),
    }
}

fn append_text(stack: &mut [XmlElement], text: &str) -> Result<(), XmlTreeError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }
    match stack.last_mut() {
        Some(current) => {
            match current.text.as_mut() {
                Some(existing) => {
                    existing.push(' ');
                    existing.push_str(text);
                }
                None => current.text = Some(text.to_string()),
            }
            Ok(())
        }
        None => Err(XmlTreeError::Parse(format!(
            "text outside of root element: {}",
            text
        ))),
    }
}
