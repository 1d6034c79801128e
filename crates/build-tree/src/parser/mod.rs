//! 빌드 도구 출력 파서 -- Maven dot, Gradle 트리, SBT 트리
//!
//! [`TreeParser`] trait은 각 빌드 도구 출력 형식의 파서가 구현해야 하는 인터페이스입니다.
//! [`FormatDetector`]는 출력 내용을 보고 어떤 빌드 도구가 생성했는지 판별합니다.
//!
//! # 지원 형식
//!
//! - `mvn dependency:tree -DoutputType=dot` -- [`MavenDotParser`]
//! - `gradle dependencies -q` -- [`GradleTreeParser`]
//! - `sbt dependency-tree` -- [`SbtTreeParser`]
//!
//! # 확장
//!
//! 새로운 형식을 지원하려면 `TreeParser` trait을 구현하고
//! `FormatDetector`에 등록합니다.

pub mod gradle;
pub mod maven;
pub mod sbt;

use std::path::Path;
use std::time::Instant;

use tracing::debug;
use treeline_core::metrics as m;
use treeline_core::types::{BuildTool, DependencyMap, DependencyNode, PACKAGE_FORMAT_VERSION};

use crate::config::BuildTreeConfig;
use crate::error::BuildTreeError;

pub use gradle::GradleTreeParser;
pub use maven::MavenDotParser;
pub use sbt::SbtTreeParser;

/// 재귀 전개 최대 깊이
///
/// 비정상 입력에서 스택이 넘치지 않도록 이보다 깊은 노드는 버립니다.
pub(crate) const MAX_NESTING_DEPTH: usize = 512;

/// 의존성 트리 파서 trait
///
/// 빌드 도구가 출력한 텍스트를 정규 의존성 트리로 재구성합니다.
/// 구현체는 호출 간 상태를 공유하지 않으므로 여러 스레드에서 동시에 호출할 수 있습니다.
pub trait TreeParser: Send + Sync {
    /// 이 파서가 담당하는 빌드 도구를 반환합니다.
    fn tool(&self) -> BuildTool;

    /// 주어진 출력을 이 파서가 처리할 수 있는지 확인합니다.
    fn detect(&self, output: &str) -> bool;

    /// 출력을 파싱하여 의존성 트리를 반환합니다.
    ///
    /// # Arguments
    ///
    /// - `output`: 빌드 도구 표준 출력 전체
    /// - `seed`: 루트 프로젝트 이름/버전 (출력에서 루트를 알 수 없는 형식에서 사용)
    fn parse(&self, output: &str, seed: &ProjectSeed) -> Result<ParsedTree, BuildTreeError>;
}

/// 호출자가 제공하는 루트 프로젝트 메타데이터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSeed {
    /// 프로젝트 이름
    pub name: String,
    /// 프로젝트 버전
    pub version: String,
}

impl ProjectSeed {
    /// 새 시드를 생성합니다.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// 이름과 버전이 비어 있지 않은지 검증합니다.
    pub fn validate(&self) -> Result<(), BuildTreeError> {
        for (field, value) in [("name", &self.name), ("version", &self.version)] {
            if value.trim().is_empty() {
                return Err(BuildTreeError::InvalidSeed {
                    field: field.to_owned(),
                    reason: "must not be empty".to_owned(),
                });
            }
        }
        Ok(())
    }
}

impl Default for ProjectSeed {
    fn default() -> Self {
        Self::new("root", "0.0.0")
    }
}

/// 파싱 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedTree {
    /// 단일 루트 노드 (Maven, SBT)
    Project(DependencyNode),
    /// 루트 없는 최상위 의존성 모음 (Gradle)
    Forest {
        /// 패키지 형식 버전 태그
        package_format_version: String,
        /// 최상위 의존성 (이름 → 노드)
        dependencies: DependencyMap,
    },
}

impl ParsedTree {
    /// 단일 루트 트리로 변환합니다.
    ///
    /// `Forest`는 `seed`의 이름/버전으로 만든 합성 루트 아래로 옮겨지며,
    /// 모든 `from` 체인이 합성 루트 기준으로 다시 계산됩니다.
    pub fn into_root(self, seed: &ProjectSeed) -> DependencyNode {
        match self {
            Self::Project(root) => root,
            Self::Forest {
                package_format_version,
                dependencies,
            } => {
                let mut root =
                    DependencyNode::wrap_root(seed.name.as_str(), seed.version.as_str(), &dependencies);
                root.package_format_version = Some(package_format_version);
                root
            }
        }
    }

    /// 전체 노드 수 (`Forest`는 합성 루트를 세지 않음)
    pub fn node_count(&self) -> usize {
        match self {
            Self::Project(root) => root.node_count(),
            Self::Forest { dependencies, .. } => {
                dependencies.values().map(DependencyNode::node_count).sum()
            }
        }
    }
}

/// 출력 형식 탐지기
///
/// 등록된 파서의 `detect` 결과를 순서대로 확인합니다.
/// Gradle 트리 마커(`+---`)는 SBT 마커(`+-`)를 포함하므로 Gradle을 SBT보다 먼저 확인합니다.
pub struct FormatDetector {
    parsers: Vec<Box<dyn TreeParser>>,
}

impl FormatDetector {
    /// 기본 파서(Maven, Gradle, SBT)로 탐지기를 생성합니다.
    pub fn new(config: &BuildTreeConfig) -> Self {
        Self {
            parsers: vec![
                Box::new(MavenDotParser::new(config.clone())),
                Box::new(GradleTreeParser::new(config.clone())),
                Box::new(SbtTreeParser::new(config.clone())),
            ],
        }
    }

    /// 출력을 생성한 빌드 도구를 판별합니다.
    pub fn detect(&self, output: &str) -> Option<BuildTool> {
        self.parsers
            .iter()
            .find(|p| p.detect(output))
            .map(|p| p.tool())
    }

    /// 빌드 도구에 해당하는 파서를 반환합니다.
    pub fn parser_for(&self, tool: BuildTool) -> Option<&dyn TreeParser> {
        self.parsers
            .iter()
            .find(|p| p.tool() == tool)
            .map(|p| p.as_ref())
    }
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new(&BuildTreeConfig::default())
    }
}

/// 빌드 도구 출력을 파싱합니다.
///
/// `tool`이 `None`이면 [`FormatDetector`]로 형식을 자동 감지합니다.
pub fn parse_output(
    output: &str,
    tool: Option<BuildTool>,
    seed: &ProjectSeed,
    config: &BuildTreeConfig,
) -> Result<ParsedTree, BuildTreeError> {
    config.validate()?;

    let detector = FormatDetector::new(config);
    let tool = match tool {
        Some(tool) => tool,
        None => detector.detect(output).ok_or_else(|| {
            BuildTreeError::UnrecognizedFormat(
                "no digraph block or dependency tree markers found".to_owned(),
            )
        })?,
    };
    debug!(tool = tool.as_str(), bytes = output.len(), "parsing build tool output");

    let parser = detector
        .parser_for(tool)
        .ok_or_else(|| BuildTreeError::UnrecognizedFormat(format!("no parser registered for {tool}")))?;
    parser.parse(output, seed)
}

/// 파일에 저장된 빌드 도구 출력을 읽어 파싱합니다.
///
/// 파일 크기가 `max_input_size`를 넘으면 읽기 전에 거부합니다.
pub fn parse_file(
    path: impl AsRef<Path>,
    tool: Option<BuildTool>,
    seed: &ProjectSeed,
    config: &BuildTreeConfig,
) -> Result<ParsedTree, BuildTreeError> {
    let path = path.as_ref();
    let io_err = |source| BuildTreeError::Io {
        path: path.display().to_string(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    let size = usize::try_from(size).unwrap_or(usize::MAX);
    if size > config.max_input_size {
        return Err(BuildTreeError::InputTooLarge {
            size,
            max: config.max_input_size,
        });
    }

    let output = std::fs::read_to_string(path).map_err(io_err)?;
    parse_output(&output, tool, seed, config)
}

/// 파싱 호출 하나의 결과와 소요 시간을 메트릭으로 기록합니다.
pub(crate) fn observe<F>(tool: BuildTool, parse: F) -> Result<ParsedTree, BuildTreeError>
where
    F: FnOnce() -> Result<ParsedTree, BuildTreeError>,
{
    let started = Instant::now();
    let result = parse();
    metrics::histogram!(m::PARSER_DURATION_SECONDS, m::LABEL_TOOL => tool.as_str())
        .record(started.elapsed().as_secs_f64());

    match &result {
        Ok(tree) => {
            let nodes = tree.node_count();
            metrics::counter!(m::PARSER_RUNS_TOTAL, m::LABEL_TOOL => tool.as_str(), m::LABEL_RESULT => "success")
                .increment(1);
            metrics::counter!(m::PARSER_NODES_EMITTED_TOTAL, m::LABEL_TOOL => tool.as_str())
                .increment(nodes as u64);
            debug!(tool = tool.as_str(), nodes, "dependency tree reconstructed");
        }
        Err(e) => {
            metrics::counter!(m::PARSER_RUNS_TOTAL, m::LABEL_TOOL => tool.as_str(), m::LABEL_RESULT => "failure")
                .increment(1);
            if matches!(e, BuildTreeError::Structure { .. }) {
                metrics::counter!(m::PARSER_FAILURES_TOTAL, m::LABEL_TOOL => tool.as_str()).increment(1);
            }
            debug!(tool = tool.as_str(), error = %e, "dependency tree parse failed");
        }
    }
    result
}

/// 무시한 라인 수를 기록합니다.
pub(crate) fn record_skipped(tool: BuildTool, skipped: usize) {
    if skipped > 0 {
        metrics::counter!(m::PARSER_LINES_SKIPPED_TOTAL, m::LABEL_TOOL => tool.as_str())
            .increment(skipped as u64);
        debug!(tool = tool.as_str(), skipped, "ignored unparsable lines");
    }
}

/// `groupId:artifactId:version` 좌표
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Coordinate {
    /// 빈 필드가 있으면 `None`을 반환합니다.
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Option<Self> {
        let (group_id, artifact_id, version) = (group_id.trim(), artifact_id.trim(), version.trim());
        if group_id.is_empty() || artifact_id.is_empty() || version.is_empty() {
            return None;
        }
        Some(Self {
            group_id: group_id.to_owned(),
            artifact_id: artifact_id.to_owned(),
            version: version.to_owned(),
        })
    }

    /// 버전과 무관한 패키지 이름 (`groupId:artifactId`)
    pub fn name(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// 부모 경로 아래에 노드를 생성합니다.
    pub fn to_node(&self, parent_from: &[String]) -> DependencyNode {
        DependencyNode::new(self.name(), self.version.as_str(), parent_from)
            .with_coordinates(self.group_id.as_str(), self.artifact_id.as_str())
    }
}

/// 트리 하나에서 생성할 수 있는 노드 수 예산
pub(crate) struct NodeBudget {
    tool: BuildTool,
    max: usize,
    used: usize,
}

impl NodeBudget {
    pub fn new(tool: BuildTool, max: usize) -> Self {
        Self { tool, max, used: 0 }
    }

    /// 노드 하나를 할당합니다. 예산을 넘으면 에러를 반환합니다.
    pub fn take(&mut self) -> Result<(), BuildTreeError> {
        self.used += 1;
        if self.used > self.max {
            return Err(BuildTreeError::TooManyNodes {
                tool: self.tool,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Maven/Gradle 결과에 붙는 형식 태그
pub(crate) fn package_format_version() -> String {
    PACKAGE_FORMAT_VERSION.to_owned()
}
