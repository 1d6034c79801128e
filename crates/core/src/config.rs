//! 설정 관리 -- treeline.toml 파싱 및 런타임 설정
//!
//! [`TreelineConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`TREELINE_PARSER_MAX_NODES=100000` 형식)
//! 3. 설정 파일 (`treeline.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), treeline_core::error::TreelineError> {
//! use treeline_core::config::TreelineConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = TreelineConfig::load("treeline.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = TreelineConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, TreelineError};

/// 입력 크기 상한 (256 MB)
const MAX_INPUT_SIZE_LIMIT: usize = 256 * 1024 * 1024;
/// 노드 수 상한
const MAX_NODES_LIMIT: usize = 5_000_000;

/// treeline 통합 설정
///
/// `treeline.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreelineConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 파서 설정
    #[serde(default)]
    pub parser: ParserConfig,
}

impl TreelineConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TreelineError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본값(+ 환경변수 오버라이드)을 사용합니다.
    ///
    /// 파일이 존재하지만 잘못된 경우에는 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, TreelineError> {
        match Self::load(path).await {
            Err(TreelineError::Config(ConfigError::FileNotFound { .. })) => {
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, TreelineError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TreelineError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                TreelineError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, TreelineError> {
        toml::from_str(toml_str).map_err(|e| {
            TreelineError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `TREELINE_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "TREELINE_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "TREELINE_GENERAL_LOG_FORMAT");

        // Parser
        override_usize(
            &mut self.parser.max_input_size,
            "TREELINE_PARSER_MAX_INPUT_SIZE",
        );
        override_usize(&mut self.parser.max_nodes, "TREELINE_PARSER_MAX_NODES");
        override_bool(
            &mut self.parser.include_test_scope,
            "TREELINE_PARSER_INCLUDE_TEST_SCOPE",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), TreelineError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.parser.max_input_size == 0 || self.parser.max_input_size > MAX_INPUT_SIZE_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "parser.max_input_size".to_owned(),
                reason: format!("must be 1-{MAX_INPUT_SIZE_LIMIT}"),
            }
            .into());
        }

        if self.parser.max_nodes == 0 || self.parser.max_nodes > MAX_NODES_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "parser.max_nodes".to_owned(),
                reason: format!("must be 1-{MAX_NODES_LIMIT}"),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 파서 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// 빌드 도구 출력의 최대 허용 크기 (바이트)
    pub max_input_size: usize,
    /// 하나의 트리에서 생성할 수 있는 최대 노드 수
    pub max_nodes: usize,
    /// Maven `test` 스코프 의존성 포함 여부
    pub include_test_scope: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_input_size: 16 * 1024 * 1024, // 16 MB
            max_nodes: 500_000,
            include_test_scope: true,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}
