// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::{json, Value};
use std::sync::Arc;
use vulncrawl::domain::services::language_analyzer::LanguageAnalyzer;
use vulncrawl::infrastructure::storage::LocalStorage;

use super::helpers::{crawler, mock_site, test_settings, MockKingdom};

fn read_json(path: std::path::PathBuf) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_crawl_all_then_analyze() {
    let server = mock_site(&[
        MockKingdom {
            name: "Errors",
            rows: vec![("/ko/detail/errors-1", vec!["C++", "Java"])],
        },
        MockKingdom {
            name: "Code Quality",
            rows: vec![("/ko/detail/quality-1", vec!["C++"])],
        },
    ])
    .await;
    let out = tempfile::tempdir().unwrap();

    let outcomes = crawler(&test_settings(&server), out.path())
        .crawl_all()
        .await
        .unwrap();
    assert_eq!(outcomes.len(), 8);
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| o.files.is_some())
            .map(|o| o.kingdom.as_str())
            .collect::<Vec<_>>(),
        vec!["Errors", "Code Quality"]
    );

    assert!(out.path().join("xml/Errors.xml").is_file());
    assert!(out.path().join("xml/Code_Quality.xml").is_file());
    assert!(!out.path().join("xml/API_Abuse.xml").exists());

    let errors = read_json(out.path().join("json/Errors.json"));
    let record = &errors["fortify_report"]["vulnerabilities"]["vulnerability"];
    assert_eq!(record["title"], "Errors #1");
    assert_eq!(record["languages"]["language"], json!(["C++", "Java"]));
    assert_eq!(record["abstract"], "Short summary.");
    assert_eq!(errors["fortify_report"]["info"]["description"], "About Errors");

    LanguageAnalyzer::new(Arc::new(LocalStorage::new(out.path())))
        .analyze()
        .await
        .unwrap()
        .unwrap();

    let summary = read_json(out.path().join("analysis/summary_by_language.json"));
    assert_eq!(
        summary,
        json!({"by_language": {
            "C++": {"Code_Quality": 1, "Errors": 1},
            "Java": {"Errors": 1}
        }})
    );
    assert!(out.path().join("analysis/summary_by_language.xml").is_file());
    let detail = read_json(out.path().join("analysis/detail_by_language/detail_by_language.json"));
    assert_eq!(detail["by_language"]["C++"].as_array().unwrap().len(), 2);
}

/// 去掉含 `generated_at` 的行，其余内容逐字节比较
fn without_timestamp(path: std::path::PathBuf) -> Vec<u8> {
    let content = std::fs::read(path).unwrap();
    content
        .split_inclusive(|b| *b == b'\n')
        .filter(|line| !line.windows(12).any(|w| w == b"generated_at"))
        .flatten()
        .copied()
        .collect()
}

#[tokio::test]
async fn test_rerun_only_changes_timestamp() {
    let server = mock_site(&[MockKingdom {
        name: "Errors",
        rows: vec![
            ("/ko/detail/a", vec!["Go"]),
            ("/ko/detail/b", vec!["Python", "Java/JSP"]),
        ],
    }])
    .await;
    let out = tempfile::tempdir().unwrap();
    let crawler = crawler(&test_settings(&server), out.path());
    let xml_path = out.path().join("xml/Errors.xml");
    let json_path = out.path().join("json/Errors.json");

    crawler.crawl_kingdom("Errors", 1).await.unwrap();
    let first_xml = std::fs::read(&xml_path).unwrap();
    let first_json = std::fs::read(&json_path).unwrap();
    let first = (without_timestamp(xml_path.clone()), without_timestamp(json_path.clone()));

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    crawler.crawl_kingdom("Errors", 1).await.unwrap();
    let second = (without_timestamp(xml_path.clone()), without_timestamp(json_path.clone()));

    assert_eq!(first, second);
    assert_ne!(first_xml, std::fs::read(&xml_path).unwrap());
    assert_ne!(first_json, std::fs::read(&json_path).unwrap());
    assert_eq!(
        first_xml.len() - first.0.len(),
        "    <generated_at>2025-01-01T00:00:00.000000Z</generated_at>\n".len()
    );

    let value = read_json(json_path);
    assert_eq!(value["fortify_report"]["info"]["vulnerability_count"], "2");
}
