// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// - 领域模型（models）：漏洞记录、分类报告、语言统计
/// - 仓库接口（repositories）：输出存储抽象
/// - 服务（services）：列表、详情、报告与统计逻辑
pub mod models;
pub mod repositories;
pub mod services;
