// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::domain::repositories::storage_repository::StorageError;
use crate::utils::xml_tree::XmlTreeError;

/// 报告写出错误
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    #[error("XML错误: {0}")]
    Xml(#[from] XmlTreeError),

    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("文件不是有效的UTF-8: {0}")]
    Encoding(String),
}

/// 语言统计错误
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    #[error("XML错误: {0}")]
    Xml(#[from] XmlTreeError),

    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),
}
