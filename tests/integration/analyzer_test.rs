// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use vulncrawl::domain::services::language_analyzer::LanguageAnalyzer;
use vulncrawl::infrastructure::storage::LocalStorage;

const CODE_QUALITY: &str = r#"{
  "fortify_report": {
    "info": {"kingdom": "Code Quality"},
    "vulnerabilities": {
      "vulnerability": [
        {"title": "a", "languages": {"language": ["C#", "VB/VB.NET"]}},
        {"title": "b", "languages": null}
      ]
    }
  }
}"#;

#[test]
fn test_malformed_file_does_not_stop_analysis() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("json")).unwrap();
    std::fs::write(dir.path().join("json/API_Abuse.json"), "{ truncated").unwrap();
    std::fs::write(dir.path().join("json/Code_Quality.json"), CODE_QUALITY).unwrap();

    let analyzer = LanguageAnalyzer::new(Arc::new(LocalStorage::new(dir.path())));
    let tally = tokio_test::block_on(analyzer.analyze()).unwrap().unwrap();

    assert_eq!(tally.count("C#", "Code_Quality"), 1);
    assert_eq!(tally.count("VB_VB.NET", "Code_Quality"), 1);
    assert_eq!(tally.language_count(), 2);
    assert!(dir.path().join("analysis/summary_by_language.json").is_file());
}

#[test]
fn test_missing_json_directory() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = LanguageAnalyzer::new(Arc::new(LocalStorage::new(dir.path())));

    assert!(tokio_test::block_on(analyzer.analyze()).unwrap().is_none());
    assert!(!dir.path().join("analysis").exists());
}
