use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use veritas_lib::db::{Database, PrefStore};
use veritas_lib::models::company::{find_company, SUPPORTED_COMPANIES};
use veritas_lib::models::prefs::Theme;
use veritas_lib::services::render::render;
use veritas_lib::services::theme::ThemeManager;
use veritas_lib::{AnalysisBackend, AnalysisClient, AnalysisSession, ApiConfig, FlowState};

#[derive(Parser)]
#[command(name = "veritas", about = "财报真相分析 - 美股生物医药公司AI财报分析客户端")]
struct Cli {
    /// 后端地址，优先于 VERITAS_API_URL 环境变量
    #[arg(long)]
    api_url: Option<String>,

    /// 使用生产环境后端
    #[arg(long)]
    production: bool,

    /// 本地数据目录（默认 ~/.veritas）
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 分析指定公司的最新财报
    Analyze { ticker: String },
    /// 查询公司基本信息
    Company { ticker: String },
    /// 列出支持的生物医药公司
    List,
    /// 查看或切换主题偏好（light / dark / toggle）
    Theme { mode: Option<String> },
}

/// 地址解析只在启动时发生一次，客户端内部不再做环境判断
fn resolve_config(cli: &Cli) -> ApiConfig {
    if cli.production {
        ApiConfig::production()
    } else if let Some(url) = &cli.api_url {
        ApiConfig::new(url.clone())
    } else {
        ApiConfig::from_env()
    }
}

fn resolve_data_dir(cli: &Cli) -> PathBuf {
    if let Some(dir) = &cli.data_dir {
        return dir.clone();
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".veritas")
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Analyze { ticker } => run_analyze(&cli, ticker).await,
        Command::Company { ticker } => run_company(&cli, ticker).await,
        Command::List => {
            run_list();
            Ok(())
        }
        Command::Theme { mode } => run_theme(&cli, mode.as_deref()),
    }
}

async fn run_analyze(cli: &Cli, ticker: &str) -> Result<()> {
    let ticker = ticker.to_uppercase();

    // 输入校验属于界面层：仅支持内置名录中的公司
    if find_company(&ticker).is_none() {
        let supported: Vec<&str> = SUPPORTED_COMPANIES.iter().map(|c| c.ticker).collect();
        bail!(
            "{} 不在支持列表中。本平台专注于美股生物医药公司，支持：{}",
            ticker,
            supported.join("、")
        );
    }

    let config = resolve_config(cli);
    let poll = config.poll.clone();
    let client = Arc::new(AnalysisClient::new(config)?);

    println!("正在分析 {} 的财报数据...", ticker);
    let mut session = AnalysisSession::new(client, poll);
    session.run(&ticker).await;

    match session.state() {
        FlowState::Resolved(view) => {
            print!("{}", render(view));
            Ok(())
        }
        FlowState::Failed { message } => {
            eprintln!("加载失败: {}", message);
            eprintln!("可执行 `veritas list` 重新选择公司，或重试本次分析。");
            std::process::exit(1);
        }
        // run 返回后只可能处于终态
        _ => bail!("分析流程未到达终态"),
    }
}

async fn run_company(cli: &Cli, ticker: &str) -> Result<()> {
    let ticker = ticker.to_uppercase();
    let client = AnalysisClient::new(resolve_config(cli))?;

    let info = client
        .get_company(&ticker)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    println!("{} - {}", info.ticker, info.company_name);
    if !info.sector.is_empty() {
        println!("行业: {}", info.sector);
    }
    if !info.cik.is_empty() {
        println!("CIK: {}  SIC: {}", info.cik, info.sic);
    }
    Ok(())
}

fn run_list() {
    println!("支持的生物医药公司：");
    for company in &SUPPORTED_COMPANIES {
        println!(
            "  {:<6} {} ({})  {}",
            company.ticker, company.name_cn, company.name_en, company.focus
        );
    }
}

fn run_theme(cli: &Cli, mode: Option<&str>) -> Result<()> {
    let store = Database::new(resolve_data_dir(cli))?;
    let mut manager = ThemeManager::load(Box::new(store) as Box<dyn PrefStore>)?;

    match mode {
        None => println!("当前主题: {}", manager.theme().as_str()),
        Some("light") => {
            manager.set(Theme::Light)?;
            println!("主题已设为 light");
        }
        Some("dark") => {
            manager.set(Theme::Dark)?;
            println!("主题已设为 dark");
        }
        Some("toggle") => {
            let next = manager.toggle()?;
            println!("主题已切换为 {}", next.as_str());
        }
        Some(other) => bail!("无效的主题参数: {}（支持 light / dark / toggle）", other),
    }
    Ok(())
}
