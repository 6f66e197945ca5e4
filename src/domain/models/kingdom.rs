// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 内置的分类（kingdom）列表，`crawl-all` 按此顺序依次爬取
pub const KINGDOMS: [&str; 8] = [
    "Input Validation and Representation",
    "API Abuse",
    "Security Features",
    "Time and State",
    "Errors",
    "Code Quality",
    "Encapsulation",
    "Environment",
];

/// 分类名到文件名主干的映射：空格换成 `_`，`&` 换成 `and`
pub fn file_stem(kingdom: &str) -> String {
    kingdom.replace(' ', "_").replace('&', "and")
}

/// 统计用的键：`/` 与空格换成 `_`
pub fn normalize_key(value: &str) -> String {
    value.replace(['/', ' '], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("API Abuse"), "API_Abuse");
        assert_eq!(file_stem("Time & State"), "Time_and_State");
        assert_eq!(
            file_stem("Input Validation and Representation"),
            "Input_Validation_and_Representation"
        );
    }

    #[test]
    fn test_file_stem_is_injective_over_kingdoms() {
        let stems: HashSet<String> = KINGDOMS.iter().map(|k| file_stem(k)).collect();
        assert_eq!(stems.len(), KINGDOMS.len());
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("PL/SQL"), "PL_SQL");
        assert_eq!(normalize_key("Code Quality"), "Code_Quality");
        assert_eq!(normalize_key("C++"), "C++");
    }
}
