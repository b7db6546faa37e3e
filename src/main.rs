use clap::Parser;
use social_uploader::app::commands;
use social_uploader::config::cli::{Cli, Command, ServeArgs};
use social_uploader::core::analytics::{AnalyticsReport, SectionBody};
use social_uploader::server::{build_router, serve, AppState};
use social_uploader::utils::error::ErrorSeverity;
use social_uploader::utils::{logger, validation::Validate};
use social_uploader::{AppConfig, Platform, Result};

/// Lines printed per series or table in the terminal summary.
const SUMMARY_ROWS: usize = 5;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    match &cli.command {
        Command::Serve(args) => logger::init_server_logger(cli.verbose, args.json_logs),
        _ => logger::init_cli_logger(cli.verbose),
    }

    // 載入配置 (檔案不存在時使用預設值)
    let config = match AppConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Failed to load config file '{}': {}", cli.config.display(), e);
            eprintln!("❌ Failed to load config file '{}': {}", cli.config.display(), e);
            eprintln!("💡 Make sure the file is valid TOML");
            std::process::exit(1);
        }
    };
    tracing::debug!("Configuration: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(cli.command, config).await {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(command: Command, config: AppConfig) -> Result<()> {
    match command {
        Command::Platforms => {
            for platform in Platform::ALL {
                println!("{}", platform);
            }
        }
        Command::Keys { file } => {
            for key in commands::list_keys(&file).await? {
                println!("{}", key);
            }
        }
        Command::Redact(args) => {
            let path = commands::redact(&args, &config).await?;
            println!("✅ Redacted copy written to {}", path.display());
        }
        Command::Export(args) => {
            let (path, bytes) = commands::export(&args, &config).await?;
            println!("📦 Bundle written to {} ({} bytes)", path.display(), bytes);
        }
        Command::Upload(args) => {
            let outcome = commands::upload(&args, &config).await?;
            println!("✅ Uploaded {} ({} bytes)", outcome.receipt.file_name, outcome.receipt.bytes);
            println!("📁 Folder: {}", outcome.receipt.folder_id);
            println!("🆔 File: {}", outcome.receipt.file_id);
            print_report(&outcome.analytics);
        }
        Command::Serve(args) => run_server(args, &config).await?,
    }
    Ok(())
}

fn print_report(report: &AnalyticsReport) {
    println!();
    println!("📊 {} insights", report.platform);
    for section in &report.sections {
        match &section.body {
            SectionBody::Metric { value } => println!("  {}: {}", section.title, value),
            SectionBody::Note { text } => println!("  {}: {}", section.title, text),
            SectionBody::Series { points } => {
                println!("  {} ({} points)", section.title, points.len());
                for point in points.iter().take(SUMMARY_ROWS) {
                    println!("    {}: {}", point.label, point.value);
                }
            }
            SectionBody::Table { columns, rows } => {
                println!("  {} [{}]", section.title, columns.join(", "));
                for row in rows.iter().take(SUMMARY_ROWS) {
                    let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
                    println!("    {}", cells.join(", "));
                }
            }
        }
    }
}

async fn run_server(args: ServeArgs, config: &AppConfig) -> Result<()> {
    let (store, settings) = config.build_store(args.local_store.as_deref())?;
    let addr = config.listen_addr(args.bind.as_deref(), args.port)?;
    let headless = args.headless.unwrap_or(config.server.headless);

    tracing::info!("🚀 Starting social-uploader server (store: {})", store.describe());
    let router = build_router(AppState { store, settings }, config.max_upload_bytes());

    if !headless {
        println!();
        println!("  You can now view the uploader in your browser.");
        println!("  Local URL: http://localhost:{}", addr.port());
        println!();
    }

    serve(router, addr).await
}
