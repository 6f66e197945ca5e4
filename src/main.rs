// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use vulncrawl::application::use_cases::crawl_use_case::CrawlUseCase;
use vulncrawl::config::settings::Settings;
use vulncrawl::domain::services::language_analyzer::LanguageAnalyzer;
use vulncrawl::engines::reqwest_engine::ReqwestEngine;
use vulncrawl::infrastructure::storage::LocalStorage;
use vulncrawl::utils::telemetry;

#[derive(Parser)]
#[command(
    name = "vulncrawl",
    about = "Crawl the vulnerability catalogue into XML/JSON and tally it by language",
    version
)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl the first N listing pages of one kingdom
    Crawl {
        #[arg(long)]
        output_dir: PathBuf,
        /// Kingdom name, e.g. "API Abuse"
        #[arg(long)]
        kingdom: String,
        /// Number of listing pages to crawl, starting at page 0
        #[arg(long)]
        pages: usize,
    },
    /// Crawl every built-in kingdom with discovered page counts
    CrawlAll {
        #[arg(long)]
        output_dir: PathBuf,
    },
    /// Tally the JSON reports under <base-dir>/json by language
    Analyze {
        #[arg(long)]
        base_dir: PathBuf,
    },
    /// crawl-all followed by analyze on the same directory
    Run {
        #[arg(long)]
        output_dir: PathBuf,
    },
}

fn crawler(settings: &Settings, output_dir: &Path) -> anyhow::Result<CrawlUseCase> {
    let engine = ReqwestEngine::new(&settings.site.user_agent)
        .context("failed to build HTTP client")?;
    let storage = LocalStorage::new(output_dir);
    Ok(CrawlUseCase::new(settings, Arc::new(engine), Arc::new(storage))?)
}

async fn analyze(base_dir: &Path) -> anyhow::Result<()> {
    let analyzer = LanguageAnalyzer::new(Arc::new(LocalStorage::new(base_dir)));
    match analyzer.analyze().await? {
        Some(tally) => info!(
            "analysis written to {}: {} language(s)",
            base_dir.join("analysis").display(),
            tally.language_count()
        ),
        None => info!("nothing to analyze under {}", base_dir.display()),
    }
    Ok(())
}

/// 主函数
///
/// 初始化日志与配置，然后执行子命令
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_telemetry(cli.json_logs);

    let settings = Settings::new().context("failed to load configuration")?;
    info!(
        base_url = %settings.site.base_url,
        profile = ?settings.markup.profile,
        "configuration loaded"
    );

    match cli.command {
        Commands::Crawl {
            output_dir,
            kingdom,
            pages,
        } => {
            let outcome = crawler(&settings, &output_dir)?
                .crawl_kingdom(&kingdom, pages)
                .await?;
            info!(
                "[{}] done: {} vulnerabilities",
                outcome.kingdom, outcome.vulnerability_count
            );
        }
        Commands::CrawlAll { output_dir } => {
            crawler(&settings, &output_dir)?.crawl_all().await?;
        }
        Commands::Analyze { base_dir } => analyze(&base_dir).await?,
        Commands::Run { output_dir } => {
            crawler(&settings, &output_dir)?.crawl_all().await?;
            analyze(&output_dir).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_crawl_requires_pages() {
        let missing = Cli::try_parse_from([
            "vulncrawl",
            "crawl",
            "--output-dir",
            "out",
            "--kingdom",
            "API Abuse",
        ]);
        assert!(missing.is_err());

        let cli = Cli::try_parse_from([
            "vulncrawl",
            "crawl",
            "--output-dir",
            "out",
            "--kingdom",
            "API Abuse",
            "--pages",
            "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Crawl { kingdom, pages, .. } => {
                assert_eq!(kingdom, "API Abuse");
                assert_eq!(pages, 3);
            }
            _ => panic!("expected crawl subcommand"),
        }
    }
}
