use clap::Parser;
use indicatif::ProgressBar;
use memory_book::aggregator::{Aggregator, HttpSource, StaticContent};
use memory_book::{cli, config, error};
use memory_book::MemoryBookGenerator;
use memory_book_common::{compose, MemoryBookData};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::path::Path;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(e) = run(cli).await {
        log::error!("{}", e);
        eprintln!("❌ {}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Generate { data, extras, output, name, boundary } => {
            println!("📖 memory-book - メモリーブック生成\n");

            // 1. データ取得
            println!("[1/3] データを読み込み中...");
            let book_data = load_data(&config, data.as_deref(), extras.as_deref()).await?;
            let stats = book_data.stats();
            println!(
                "✔ 写真{}枚 / 同期{}名 / 行事{}件\n",
                stats.total_photos, stats.total_colleagues, stats.total_events
            );

            // 2. 組版・描画・PDF化
            println!("[2/3] PDFを生成中...");
            let mut generator = MemoryBookGenerator::from_config(&config)?;
            if let Some(name) = name {
                generator = generator.with_book_name(name);
            }
            if let Some(boundary) = boundary {
                generator = generator.with_boundary(boundary);
            }

            let spinner = ProgressBar::new_spinner();
            spinner.set_message("ブラウザで描画中...");
            spinner.enable_steady_tick(Duration::from_millis(120));
            let result = generator.generate_memory_book_async(book_data).await;
            spinner.finish_and_clear();
            let pdf = result?;
            println!("✔ {} ({}バイト)\n", pdf.file_name, pdf.bytes.len());

            // 3. 保存
            println!("[3/3] 保存中...");
            let path = pdf.save(&output)?;
            println!("✔ PDF出力: {}", path.display());

            println!("\n✅ 完了");
        }

        Commands::Fetch { output, extras } => {
            println!("📥 memory-book - データ取得\n");

            let book_data = load_data(&config, None, extras.as_deref()).await?;
            let json = serde_json::to_string_pretty(&book_data)?;
            std::fs::write(&output, json)?;
            println!("✔ 保存: {}", output.display());
        }

        Commands::Compose { data, extras, output } => {
            println!("📝 memory-book - HTML出力\n");

            let book_data = load_data(&config, data.as_deref(), extras.as_deref()).await?;
            let html = compose(&book_data, &config.layout()?, chrono::Local::now().date_naive());
            std::fs::write(&output, html)?;
            println!("✔ HTML出力: {}", output.display());
        }

        Commands::ExportHtml { input, element, output } => {
            println!("📄 memory-book - HTMLからPDF\n");

            let html = std::fs::read_to_string(&input)?;
            let generator = MemoryBookGenerator::from_config(&config)?;
            let path = generator.generate_from_html(&html, element.as_deref(), &output)?;
            println!("✔ PDF出力: {}", path.display());
        }

        Commands::Config { set_api_base, show } => {
            let mut config = config;

            if let Some(base) = set_api_base {
                config.set_api_base(base)?;
                println!("✔ APIベースURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  APIベースURL: {}", config.api_base);
                println!("  ファイル名: {}", config.book_name);
                println!("  ブラウザ: {}", config.browser);
                println!("  倍率: {}", config.device_scale_factor);
                println!("  1ページの写真数: {}", config.photos_per_page);
                println!("  境界判定: {}", config.slice_boundary);
            }
        }
    }

    Ok(())
}

/// JSONファイルまたはAPIからデータを用意
async fn load_data(config: &Config, data: Option<&Path>, extras: Option<&Path>) -> Result<MemoryBookData> {
    let static_content = match extras {
        Some(path) => Some(StaticContent::load(path)?),
        None => None,
    };

    match data {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            let mut book_data: MemoryBookData = serde_json::from_str(&content)?;
            // 静的コンテンツ指定時は上書き
            if let Some(extras) = static_content {
                book_data.graduation = extras.graduation;
                book_data.historical = extras.historical;
                book_data.history_groups = extras.history_groups;
            }
            Ok(book_data)
        }
        None => {
            log::info!("APIから取得: {}", config.api_base);
            let source = HttpSource::new(&config.api_base, Duration::from_secs(config.request_timeout_seconds))?;
            let aggregator = Aggregator::new(source, static_content.unwrap_or_default());
            aggregator.fetch_all().await
        }
    }
}
