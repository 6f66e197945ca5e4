// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 存储仓库特质
///
/// 以相对键（例如 `xml/Errors.xml`）访问输出目录中的文件
#[async_trait]
pub trait StorageRepository: Send + Sync {
    /// 使用指定键保存数据到存储中，必要时创建父目录
    async fn save(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// 根据键从存储中检索数据
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// 列出某个目录前缀下的直接条目键，按字典序排列
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// 检查存储中是否存在指定键（文件或目录前缀）
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;
}
