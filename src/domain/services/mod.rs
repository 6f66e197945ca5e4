// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 列表服务（listing_service）：分类列表页、分类描述与页数
/// - 详情服务（detail_service）：漏洞详情页解析
/// - 报告服务（report_service）：XML 报告写出与 JSON 折叠
/// - 语言统计（language_analyzer）：按语言与分类汇总
pub mod detail_service;
pub mod language_analyzer;
pub mod listing_service;
pub mod report_service;
