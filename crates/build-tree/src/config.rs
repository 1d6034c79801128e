//! 파서 설정
//!
//! [`BuildTreeConfig`]는 core의 [`ParserConfig`](treeline_core::config::ParserConfig)에서
//! 파생되며, 파싱 호출 하나에 적용되는 제한값을 담습니다.
//!
//! # 사용 예시
//!
//! ```
//! use treeline_build_tree::{BuildTreeConfig, BuildTreeConfigBuilder};
//!
//! // 기본값으로 생성
//! let config = BuildTreeConfig::default();
//! config.validate().unwrap();
//!
//! // 빌더로 생성
//! let config = BuildTreeConfigBuilder::new()
//!     .max_nodes(10_000)
//!     .include_test_scope(false)
//!     .build()
//!     .unwrap();
//! assert!(!config.include_test_scope);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::BuildTreeError;

/// 설정 상한값 상수
const MAX_INPUT_SIZE_LIMIT: usize = 256 * 1024 * 1024; // 256 MB
const MAX_NODES_LIMIT: usize = 5_000_000;

/// 파서 설정
///
/// # 필드
///
/// - **max_input_size**: 빌드 도구 출력 최대 크기 (바이트)
/// - **max_nodes**: 트리 하나에서 생성할 수 있는 최대 노드 수
/// - **include_test_scope**: Maven `test` 스코프 의존성 포함 여부
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTreeConfig {
    /// 빌드 도구 출력 최대 허용 크기 (바이트)
    pub max_input_size: usize,
    /// 트리 하나당 최대 노드 수
    ///
    /// Maven DAG 전개와 Gradle 생략 서브트리 복원은 입력 크기에 비해
    /// 노드 수가 크게 늘어날 수 있습니다.
    pub max_nodes: usize,
    /// Maven `test` 스코프 의존성 포함 여부
    pub include_test_scope: bool,
}

impl Default for BuildTreeConfig {
    fn default() -> Self {
        Self {
            max_input_size: 16 * 1024 * 1024, // 16 MB
            max_nodes: 500_000,
            include_test_scope: true,
        }
    }
}

impl BuildTreeConfig {
    /// core의 `ParserConfig`에서 파서 설정을 생성합니다.
    pub fn from_core(core: &treeline_core::config::ParserConfig) -> Self {
        Self {
            max_input_size: core.max_input_size,
            max_nodes: core.max_nodes,
            include_test_scope: core.include_test_scope,
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `max_input_size`: 1-268435456 (256MB)
    /// - `max_nodes`: 1-5000000
    pub fn validate(&self) -> Result<(), BuildTreeError> {
        if self.max_input_size == 0 || self.max_input_size > MAX_INPUT_SIZE_LIMIT {
            return Err(BuildTreeError::Config {
                field: "max_input_size".to_owned(),
                reason: format!("must be 1-{MAX_INPUT_SIZE_LIMIT}"),
            });
        }

        if self.max_nodes == 0 || self.max_nodes > MAX_NODES_LIMIT {
            return Err(BuildTreeError::Config {
                field: "max_nodes".to_owned(),
                reason: format!("must be 1-{MAX_NODES_LIMIT}"),
            });
        }

        Ok(())
    }

    /// 입력 크기 제한을 검사합니다.
    pub(crate) fn check_input_size(&self, output: &str) -> Result<(), BuildTreeError> {
        if output.len() > self.max_input_size {
            return Err(BuildTreeError::InputTooLarge {
                size: output.len(),
                max: self.max_input_size,
            });
        }
        Ok(())
    }
}

/// [`BuildTreeConfig`] 빌더
///
/// 빌드 시 유효성 검증을 수행합니다.
#[derive(Default)]
pub struct BuildTreeConfigBuilder {
    config: BuildTreeConfig,
}

impl BuildTreeConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn max_input_size(mut self, size: usize) -> Self {
        self.config.max_input_size = size;
        self
    }

    /// 최대 노드 수를 설정합니다.
    pub fn max_nodes(mut self, max: usize) -> Self {
        self.config.max_nodes = max;
        self
    }

    /// `test` 스코프 포함 여부를 설정합니다.
    pub fn include_test_scope(mut self, include: bool) -> Self {
        self.config.include_test_scope = include;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    pub fn build(self) -> Result<BuildTreeConfig, BuildTreeError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BuildTreeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_nodes, 500_000);
        assert!(config.include_test_scope);
    }

    #[test]
    fn from_core_copies_parser_section() {
        let core = treeline_core::config::ParserConfig {
            max_input_size: 1024,
            max_nodes: 50,
            include_test_scope: false,
        };
        let config = BuildTreeConfig::from_core(&core);
        assert_eq!(config.max_input_size, 1024);
        assert_eq!(config.max_nodes, 50);
        assert!(!config.include_test_scope);
    }

    #[test]
    fn validate_rejects_zero_input_size() {
        let config = BuildTreeConfig {
            max_input_size: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_input_size"));
    }

    #[test]
    fn validate_rejects_excessive_nodes() {
        let config = BuildTreeConfig {
            max_nodes: MAX_NODES_LIMIT + 1,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_nodes"));
    }

    #[test]
    fn builder_validates_on_build() {
        let result = BuildTreeConfigBuilder::new().max_nodes(0).build();
        assert!(result.is_err());

        let config = BuildTreeConfigBuilder::new()
            .max_input_size(4096)
            .build()
            .unwrap();
        assert_eq!(config.max_input_size, 4096);
    }

    #[test]
    fn check_input_size_rejects_oversized_output() {
        let config = BuildTreeConfig {
            max_input_size: 4,
            ..Default::default()
        };
        assert!(config.check_input_size("abcd").is_ok());
        let err = config.check_input_size("abcde").unwrap_err();
        assert!(matches!(
            err,
            BuildTreeError::InputTooLarge { size: 5, max: 4 }
        ));
    }
}
