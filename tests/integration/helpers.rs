// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use vulncrawl::application::use_cases::crawl_use_case::CrawlUseCase;
use vulncrawl::config::settings::Settings;
use vulncrawl::engines::reqwest_engine::ReqwestEngine;
use vulncrawl::infrastructure::storage::LocalStorage;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 一个分类的模拟数据：分类名与（详情路径，语言列表）
pub struct MockKingdom {
    pub name: &'static str,
    pub rows: Vec<(&'static str, Vec<&'static str>)>,
}

fn listing_html(kingdom: &MockKingdom) -> String {
    let rows: String = kingdom
        .rows
        .iter()
        .enumerate()
        .map(|(i, (detail, _))| {
            format!(
                r#"<div class="weaknessCell" data-id="{}"><h1>{} #{}</h1>
                   <a class="external-link" href="{}">details</a></div>"#,
                i + 1,
                kingdom.name,
                i + 1,
                detail
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="panel"><p>About {}</p></div>{}</body></html>"#,
        kingdom.name, rows
    )
}

fn detail_html(languages: &[&str]) -> String {
    let tabs: String = languages
        .iter()
        .map(|l| format!("<li><a href=\"#\">{}</a></li>", l))
        .collect();
    format!(
        r#"<html><body><ul class="nav-tabs">{}</ul>
           <div class="sub-title">Abstract</div><div class="t">Short summary.</div>
           <div class="sub-title">Explanation</div><div class="t">Longer text.</div>
           </body></html>"#,
        tabs
    )
}

/// 启动模拟站点：列出的分类各有一页数据，其余分类为空页
pub async fn mock_site(kingdoms: &[MockKingdom]) -> MockServer {
    let server = MockServer::start().await;

    for kingdom in kingdoms {
        Mock::given(method("GET"))
            .and(path("/ko/weakness"))
            .and(query_param("kingdom", kingdom.name))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(kingdom)))
            .mount(&server)
            .await;
        for (detail, languages) in &kingdom.rows {
            Mock::given(method("GET"))
                .and(path(*detail))
                .respond_with(ResponseTemplate::new(200).set_body_string(detail_html(languages)))
                .mount(&server)
                .await;
        }
    }

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    server
}

pub fn test_settings(server: &MockServer) -> Settings {
    let mut settings = Settings::from_defaults().expect("default settings");
    settings.site.base_url = server.uri();
    settings.crawler.page_delay_ms = 0;
    settings
}

pub fn crawler(settings: &Settings, output_dir: &std::path::Path) -> CrawlUseCase {
    CrawlUseCase::new(
        settings,
        Arc::new(ReqwestEngine::new("vulncrawl-test").expect("client")),
        Arc::new(LocalStorage::new(output_dir)),
    )
    .expect("use case")
}
