// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 存储实现（本地文件系统与内存）
pub mod storage;
