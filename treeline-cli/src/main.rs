//! treeline CLI -- 빌드 도구 의존성 리포트를 하나의 의존성 트리로 변환하는 명령줄 도구
//!
//! 설정 로드 → 로깅 초기화 → 서브커맨드 실행 순서로 동작하며,
//! 실패 시 [`CliError::exit_code`]에 따른 종료 코드를 반환합니다.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::info;

use treeline_core::config::TreelineConfig;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG_PATH};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = match load_config(&cli).await {
        Ok(config) => config,
        // config validate 는 잘못된 설정을 리포트로 보여줘야 함
        Err(_) if cli.command.tolerates_invalid_config() => TreelineConfig::default(),
        Err(e) => return Err(e),
    };

    logging::init_tracing(&config.general, cli.log_level.as_deref())
        .map_err(|e| CliError::Config(e.to_string()))?;
    treeline_core::metrics::describe_all();

    let config_path = cli.config_path();
    info!(config = %config_path.display(), "treeline starting");

    let writer = OutputWriter::new(cli.output);
    match cli.command {
        Commands::Parse(args) => commands::parse::execute(args, &config, &writer).await,
        Commands::Paths(args) => commands::paths::execute(args, &config, &writer).await,
        Commands::Config(args) => {
            commands::config::execute(args, &config_path, &config, &writer).await
        }
    }
}

/// 명시된 설정 파일은 반드시 존재해야 하며, 기본 경로는 없으면 기본값을 사용합니다.
async fn load_config(cli: &Cli) -> Result<TreelineConfig, CliError> {
    let config = match &cli.config {
        Some(path) => TreelineConfig::load(path).await?,
        None => TreelineConfig::load_or_default(DEFAULT_CONFIG_PATH).await?,
    };
    Ok(config)
}
