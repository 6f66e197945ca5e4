// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 把领域服务编排成命令行可以直接调用的用例
pub mod use_cases;
