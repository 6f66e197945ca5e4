// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心数据结构，包括：
/// - 分类（kingdom）：内置分类列表与文件名映射
/// - 漏洞（vulnerability）：列表页存根、详情页字段及合并后的记录
/// - 分类报告（report）：写成 XML/JSON 的一个分类的全部记录
/// - 语言统计（language_tally）：语言 → 分类 → 数量
pub mod kingdom;
pub mod language_tally;
pub mod report;
pub mod vulnerability;
