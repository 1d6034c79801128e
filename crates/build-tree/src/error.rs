//! 의존성 트리 파서 에러 타입
//!
//! [`BuildTreeError`]는 빌드 도구 출력 재구성 중 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<BuildTreeError> for TreelineError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **구조적 파싱 실패**: `Structure` (기대하는 최상위 구조가 전혀 없음)
//! - **형식 감지 실패**: `UnrecognizedFormat`
//! - **입력 제한**: `InputTooLarge`, `TooManyNodes`
//! - **호출자 입력**: `InvalidSeed`
//! - **설정**: `Config`, `Pattern`
//! - **파일 I/O**: `Io`

use std::fmt;

use treeline_core::error::{ConfigError, ParseError, TreelineError};
use treeline_core::types::BuildTool;

/// 구조적 파싱이 실패한 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    /// 라인 필터링 후 남은 트리 라인이 없음
    LineFilter,
    /// `digraph { ... }` 블록을 찾지 못함
    DigraphExtract,
    /// 루트 프로젝트 좌표를 해석할 수 없음
    RootCoordinate,
    /// 트리 구성 중 실패
    TreeBuild,
}

impl ParseStage {
    /// 에러 메시지에 쓰는 단계 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LineFilter => "line-filter",
            Self::DigraphExtract => "digraph-extract",
            Self::RootCoordinate => "root-coordinate",
            Self::TreeBuild => "tree-build",
        }
    }
}

impl fmt::Display for ParseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 의존성 트리 파서 도메인 에러
///
/// # 에러 변환
///
/// `From<BuildTreeError> for TreelineError` 구현으로
/// CLI에서 사용하는 최상위 에러 타입으로 자동 변환됩니다.
#[derive(Debug, thiserror::Error)]
pub enum BuildTreeError {
    /// 기대하는 최상위 구조가 입력에 없음
    #[error("{tool} structure error at stage '{stage}': {reason}")]
    Structure {
        /// 입력을 생성한 빌드 도구
        tool: BuildTool,
        /// 실패한 단계
        stage: ParseStage,
        /// 실패 사유
        reason: String,
    },

    /// 출력 형식을 감지할 수 없음
    #[error("unrecognized build tool output: {0}")]
    UnrecognizedFormat(String),

    /// 입력 크기 초과
    #[error("input too large: {size} bytes (max: {max})")]
    InputTooLarge {
        /// 실제 입력 크기 (바이트)
        size: usize,
        /// 최대 허용 크기 (바이트)
        max: usize,
    },

    /// 트리 노드 수 초과
    #[error("{tool} tree exceeds {max} nodes")]
    TooManyNodes {
        /// 입력을 생성한 빌드 도구
        tool: BuildTool,
        /// 최대 허용 노드 수
        max: usize,
    },

    /// 호출자가 제공한 프로젝트 메타데이터 오류
    #[error("invalid project seed: {field}: {reason}")]
    InvalidSeed {
        /// 필드명 (name, version)
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 정규식 컴파일 실패
    #[error("pattern error: {0}")]
    Pattern(String),

    /// 파일 I/O 에러
    #[error("io error: {path}: {source}")]
    Io {
        /// 관련 파일 경로
        path: String,
        /// 원본 I/O 에러
        source: std::io::Error,
    },
}

impl BuildTreeError {
    pub(crate) fn structure(tool: BuildTool, stage: ParseStage, reason: impl Into<String>) -> Self {
        Self::Structure {
            tool,
            stage,
            reason: reason.into(),
        }
    }
}

impl From<regex::Error> for BuildTreeError {
    fn from(err: regex::Error) -> Self {
        Self::Pattern(err.to_string())
    }
}

impl From<BuildTreeError> for TreelineError {
    fn from(err: BuildTreeError) -> Self {
        match err {
            BuildTreeError::Structure {
                tool,
                stage,
                reason,
            } => TreelineError::Parse(ParseError::Failed {
                format: tool.to_string(),
                stage: stage.to_string(),
                reason,
            }),
            BuildTreeError::UnrecognizedFormat(msg) => {
                TreelineError::Parse(ParseError::UnsupportedFormat(msg))
            }
            BuildTreeError::InputTooLarge { size, max } => {
                TreelineError::Parse(ParseError::TooLarge { size, max })
            }
            BuildTreeError::TooManyNodes { tool, max } => TreelineError::Parse(ParseError::Failed {
                format: tool.to_string(),
                stage: ParseStage::TreeBuild.to_string(),
                reason: format!("tree exceeds {max} nodes"),
            }),
            BuildTreeError::InvalidSeed { field, reason } => {
                TreelineError::Config(ConfigError::InvalidValue {
                    field: format!("project.{field}"),
                    reason,
                })
            }
            BuildTreeError::Config { field, reason } => {
                TreelineError::Config(ConfigError::InvalidValue { field, reason })
            }
            BuildTreeError::Pattern(msg) => {
                TreelineError::Parse(ParseError::UnsupportedFormat(format!("pattern error: {msg}")))
            }
            BuildTreeError::Io { source, .. } => TreelineError::Io(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_error_display() {
        let err = BuildTreeError::structure(
            BuildTool::Maven,
            ParseStage::DigraphExtract,
            "no digraph block found",
        );
        assert_eq!(
            err.to_string(),
            "maven structure error at stage 'digraph-extract': no digraph block found"
        );
    }

    #[test]
    fn too_many_nodes_display() {
        let err = BuildTreeError::TooManyNodes {
            tool: BuildTool::Gradle,
            max: 10,
        };
        assert_eq!(err.to_string(), "gradle tree exceeds 10 nodes");
    }

    #[test]
    fn invalid_seed_display() {
        let err = BuildTreeError::InvalidSeed {
            field: "name".to_owned(),
            reason: "must not be empty".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("name"));
        assert!(msg.contains("must not be empty"));
    }

    #[test]
    fn regex_error_converts_to_pattern() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: BuildTreeError = regex_err.into();
        assert!(matches!(err, BuildTreeError::Pattern(_)));
    }

    #[test]
    fn converts_structure_to_parse_failed() {
        let err = BuildTreeError::structure(BuildTool::Sbt, ParseStage::LineFilter, "empty");
        let top: TreelineError = err.into();
        match top {
            TreelineError::Parse(ParseError::Failed { format, stage, .. }) => {
                assert_eq!(format, "sbt");
                assert_eq!(stage, "line-filter");
            }
            other => panic!("unexpected conversion: {other:?}"),
        }
    }

    #[test]
    fn converts_unrecognized_format() {
        let err = BuildTreeError::UnrecognizedFormat("no tree markers".to_owned());
        let top: TreelineError = err.into();
        assert!(matches!(
            top,
            TreelineError::Parse(ParseError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn converts_input_too_large() {
        let err = BuildTreeError::InputTooLarge { size: 20, max: 10 };
        let top: TreelineError = err.into();
        assert!(matches!(
            top,
            TreelineError::Parse(ParseError::TooLarge { size: 20, max: 10 })
        ));
    }

    #[test]
    fn converts_seed_and_config_to_config_error() {
        let err = BuildTreeError::InvalidSeed {
            field: "version".to_owned(),
            reason: "blank".to_owned(),
        };
        let top: TreelineError = err.into();
        assert!(top.to_string().contains("project.version"));

        let err = BuildTreeError::Config {
            field: "max_nodes".to_owned(),
            reason: "zero".to_owned(),
        };
        let top: TreelineError = err.into();
        assert!(matches!(
            top,
            TreelineError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn converts_io_error() {
        let err = BuildTreeError::Io {
            path: "deps.txt".to_owned(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let top: TreelineError = err.into();
        assert!(matches!(top, TreelineError::Io(_)));
    }
}
