// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
/// 包括日志初始化、错误类型、XML 树与 XML→JSON 折叠等
pub mod errors;
pub mod telemetry;
pub mod text_processing;
pub mod url_utils;
pub mod xml_folding;
pub mod xml_tree;
