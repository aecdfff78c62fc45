//! Stock Buzz collector CLI.

use anyhow::Context;
use buzz_collector::modules::{self, AlertRecorder, Collector, ALERT_HISTORY_FILE};
use buzz_collector::CollectorConfig;
use buzz_core::Stoplist;
use buzz_data::{HangulTokenizer, KrxListingProvider, TelegramWebSource};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "buzz-collector")]
#[command(about = "Stock Buzz Telegram Collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 수집 주기 1회 실행
    RunOnce,

    /// 종료 신호(Ctrl+C, SIGTERM)까지 주기 반복
    Daemon,

    /// 저장된 알림 이력 출력
    Alerts {
        /// 출력할 최대 건수
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// 종목 디렉토리 구성 결과 확인
    Directory {
        /// 함께 출력할 종목명 수
        #[arg(long, default_value_t = 10)]
        sample: usize,
    },
}

/// Ctrl+C 또는 SIGTERM 수신 시 종료 토큰 취소
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Ctrl+C 핸들러 설치 실패: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("SIGTERM 핸들러 설치 실패: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("Ctrl+C 수신, 현재 채널 처리 후 종료합니다"),
        _ = terminate => tracing::warn!("SIGTERM 수신, 현재 채널 처리 후 종료합니다"),
    }

    shutdown_token.cancel();
}

fn build_collector(config: CollectorConfig) -> anyhow::Result<Collector> {
    let source = TelegramWebSource::new(config.telegram_config())
        .context("텔레그램 채널 소스 생성 실패")?;
    let listing =
        KrxListingProvider::new(config.krx_config()).context("KRX 시세 제공자 생성 실패")?;

    Ok(Collector::new(
        config,
        Box::new(source),
        Box::new(listing),
        Box::new(HangulTokenizer::new()),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "buzz_collector={},buzz_data={},buzz_core={}",
                    cli.log_level, cli.log_level, cli.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Stock Buzz Collector 시작");

    let config = CollectorConfig::from_env()?;
    tracing::debug!(
        channels = config.channels.channels.len(),
        disclosure = ?config.channels.disclosure_channels,
        policy = %config.alert.policy,
        output_dir = %config.output.dir.display(),
        "설정 로드 완료"
    );

    match cli.command {
        Commands::RunOnce => {
            config.require_channels()?;
            let mut collector = build_collector(config)?;
            let shutdown = CancellationToken::new();
            tokio::spawn(shutdown_signal(shutdown.clone()));

            let stats = collector.run_cycle(&shutdown).await?;
            stats.log_summary("수집 주기");
        }
        Commands::Daemon => {
            config.require_channels()?;
            let mut collector = build_collector(config)?;
            let shutdown = CancellationToken::new();
            tokio::spawn(shutdown_signal(shutdown.clone()));

            collector.run_daemon(shutdown).await;
        }
        Commands::Alerts { limit } => {
            let recorder = AlertRecorder::load(
                config.output.dir.join(ALERT_HISTORY_FILE),
                config.alert.cap,
                config.alert.policy,
            );
            if recorder.is_empty() {
                println!("저장된 알림이 없습니다.");
            } else {
                println!("\n🚨 최근 알림 ({}건 중 {}건):", recorder.len(), limit.min(recorder.len()));
                println!("{:-<80}", "");
                for alert in recorder.history().iter().take(limit) {
                    println!(
                        "  {} | {:<12} | {:<10} | {}",
                        alert.time, alert.ticker, alert.keyword, alert.link
                    );
                    println!("      {}", alert.content);
                }
                println!("{:-<80}", "");
            }
        }
        Commands::Directory { sample } => {
            let listing =
                KrxListingProvider::new(config.krx_config()).context("KRX 시세 제공자 생성 실패")?;
            let directory = modules::build_directory(&listing, &Stoplist::builtin()).await?;
            println!("\n📋 종목 디렉토리: {}개 종목", directory.len());
            println!("{:-<80}", "");
            for name in directory.names().take(sample) {
                if let Some(info) = directory.get(name) {
                    println!(
                        "  {:<8} | {:<16} | {:>12} | {:+.2}%",
                        info.code, info.name, info.last_price, info.change_pct
                    );
                }
            }
            println!("{:-<80}", "");
        }
    }

    Ok(())
}
