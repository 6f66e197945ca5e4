// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理站点地址、爬取行为以及页面标记（CSS选择器）的配置
pub mod markup;
pub mod settings;
