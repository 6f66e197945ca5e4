// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 把领域服务编排为爬取用例
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置、环境变量和页面选择器
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、服务和仓库接口
pub mod domain;

/// 引擎模块
///
/// 页面获取引擎
pub mod engines;

/// 基础设施模块
///
/// 输出目录存储
pub mod infrastructure;

/// 工具模块
///
/// 提供 XML 树、XML→JSON 折叠、文本与 URL 处理、日志初始化等功能
pub mod utils;
