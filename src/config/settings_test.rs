// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::*;

#[test]
fn test_default_settings() {
    let settings = Settings::from_defaults().expect("defaults should load");

    assert_eq!(settings.site.base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.site.locale, "ko");
    assert_eq!(settings.crawler.request_timeout_secs, 15);
    assert_eq!(settings.crawler.page_delay_ms, 500);
    assert_eq!(settings.crawler.detail_layout, DetailLayout::Flat);
    assert_eq!(settings.crawler.page_strategy, PageStrategy::Pagination);
    assert!(settings.crawler.page_table.is_empty());
    assert_eq!(settings.markup.profile, MarkupProfile::Weakness);
    assert_eq!(settings.request_timeout(), Duration::from_secs(15));
    assert_eq!(settings.page_delay(), Duration::from_millis(500));
}

#[test]
fn test_listing_url_joins_locale() {
    let settings = Settings::from_defaults().unwrap();
    assert_eq!(
        settings.listing_url().unwrap().as_str(),
        "https://vulncat.fortify.com/ko/weakness"
    );
}

#[test]
fn test_fixed_page_count_lookup() {
    let mut settings = Settings::from_defaults().unwrap();
    settings.crawler.page_table = vec![PageTableEntry {
        kingdom: "API Abuse".to_string(),
        pages: 7,
    }];

    assert_eq!(settings.fixed_page_count("API Abuse"), Some(7));
    assert_eq!(settings.fixed_page_count("Errors"), None);
}

#[test]
fn test_invalid_base_url_rejected() {
    let mut settings = Settings::from_defaults().unwrap();
    settings.site.base_url = "not a url".to_string();
    assert!(settings.validate().is_err());
}

#[test]
fn test_invalid_selector_override_rejected() {
    let mut settings = Settings::from_defaults().unwrap();
    settings.markup.overrides.section_body = Some(":::".to_string());
    assert!(settings.validate().is_err());
}

#[test]
fn test_markup_override_applies() {
    let mut settings = Settings::from_defaults().unwrap();
    settings.markup.profile = MarkupProfile::Legacy;
    settings.markup.overrides.page_param = Some("p".to_string());

    let markup = settings.site_markup();
    assert_eq!(markup.page_param, "p");
    assert_eq!(markup.listing_row, "div.weakness-item");
}
