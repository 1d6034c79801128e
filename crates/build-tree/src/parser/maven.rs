//! Maven dot 그래프 파서
//!
//! [`MavenDotParser`]는 `mvn dependency:tree -DoutputType=dot` 출력을 파싱합니다.
//! 멀티 모듈 빌드에서는 모듈마다 `digraph` 블록이 하나씩 출력되며,
//! 첫 번째 블록이 루트 프로젝트, 나머지 블록은 루트의 의존성으로 합쳐집니다.
//!
//! # 출력 형식 예시
//!
//! ```text
//! [INFO] digraph "com.app:root:jar:1.0" {
//! [INFO] 	"com.app:root:jar:1.0" -> "org.lib:util:jar:2.3:compile" ;
//! [INFO] 	"org.lib:util:jar:2.3:compile" -> "org.lib:codec:jar:1.1:runtime" ;
//! [INFO]  }
//! ```
//!
//! # 좌표 형식
//!
//! - `groupId:artifactId:packaging:version`
//! - `groupId:artifactId:packaging:version:scope`
//! - `groupId:artifactId:packaging:classifier:version:scope`

use std::collections::HashSet;

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;
use treeline_core::types::{BuildTool, DependencyNode};

use crate::config::BuildTreeConfig;
use crate::error::{BuildTreeError, ParseStage};
use crate::parser::{
    Coordinate, MAX_NESTING_DEPTH, NodeBudget, ParsedTree, ProjectSeed, TreeParser, observe,
    package_format_version, record_skipped,
};
use crate::pipeline::LinePipeline;

const CONSTRAINT_MARKER: &str = "selected from constraint";

/// Maven dot 출력 파서
pub struct MavenDotParser {
    config: BuildTreeConfig,
}

impl MavenDotParser {
    /// 주어진 설정으로 파서를 생성합니다.
    pub fn new(config: BuildTreeConfig) -> Self {
        Self { config }
    }
}

impl Default for MavenDotParser {
    fn default() -> Self {
        Self::new(BuildTreeConfig::default())
    }
}

impl TreeParser for MavenDotParser {
    fn tool(&self) -> BuildTool {
        BuildTool::Maven
    }

    fn detect(&self, output: &str) -> bool {
        output.contains("digraph") && output.contains('{')
    }

    fn parse(&self, output: &str, _seed: &ProjectSeed) -> Result<ParsedTree, BuildTreeError> {
        observe(BuildTool::Maven, || {
            self.config.check_input_size(output)?;
            MavenRun::new(&self.config)?.parse(output)
        })
    }
}

/// 좌표 + Maven 전용 주석
#[derive(Debug, Clone, PartialEq, Eq)]
struct MavenCoordinate {
    coordinate: Coordinate,
    scope: Option<String>,
    dep: Option<String>,
}

impl MavenCoordinate {
    fn name(&self) -> String {
        self.coordinate.name()
    }

    fn to_node(&self, parent_from: &[String]) -> DependencyNode {
        let mut node = self.coordinate.to_node(parent_from);
        node.scope = self.scope.clone();
        node.dep = self.dep.clone();
        node
    }

    fn is_test_scope(&self) -> bool {
        self.scope.as_deref() == Some("test")
    }
}

/// 좌표 문자열을 파싱합니다.
///
/// `selected from constraint` 주석이 있으면 괄호 안 내용을 `dep`로 보존합니다.
fn parse_coordinate(raw: &str) -> Option<MavenCoordinate> {
    let raw = raw.trim();
    let text = raw.split_whitespace().next()?;

    let dep = if raw.contains(CONSTRAINT_MARKER) {
        match (raw.find('('), raw.rfind(')')) {
            (Some(open), Some(close)) if open < close => Some(raw[open + 1..close].to_owned()),
            _ => None,
        }
    } else {
        None
    };

    let parts: Vec<&str> = text.split(':').collect();
    let (group, artifact, version, scope) = match parts.as_slice() {
        [group, artifact, _packaging, version] => (*group, *artifact, *version, None),
        [group, artifact, _packaging, version, scope] => (*group, *artifact, *version, Some(*scope)),
        [group, artifact, _packaging, _classifier, version, scope] => {
            (*group, *artifact, *version, Some(*scope))
        }
        _ => return None,
    };

    Some(MavenCoordinate {
        coordinate: Coordinate::new(group, artifact, version)?,
        scope: scope.filter(|s| !s.is_empty()).map(str::to_owned),
        dep,
    })
}

/// 첫 번째 `"`와 마지막 `"` 사이의 문자열
fn dequote(text: &str) -> Option<&str> {
    let open = text.find('"')?;
    let close = text.rfind('"')?;
    (open < close).then(|| &text[open + 1..close])
}

/// 하나의 `digraph` 블록
struct DotGraph<'a> {
    identity: Option<&'a str>,
    edges: IndexMap<&'a str, Vec<&'a str>>,
}

impl<'a> DotGraph<'a> {
    /// 블록 텍스트에서 식별자 라인과 간선을 추출합니다.
    fn parse(block: &'a str, skipped: &mut usize) -> Self {
        let mut lines = block.lines();
        let identity = lines.next().and_then(dequote);
        let mut edges: IndexMap<&str, Vec<&str>> = IndexMap::new();

        for line in lines {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed == "}" {
                continue;
            }
            let Some((source, target)) = trimmed.split_once("->") else {
                *skipped += 1;
                continue;
            };
            match (dequote(source), dequote(target)) {
                (Some(source), Some(target)) => edges.entry(source).or_default().push(target),
                _ => *skipped += 1,
            }
        }

        Self { identity, edges }
    }
}

/// 파싱 호출 하나의 상태 (정규식, 노드 예산)
struct MavenRun<'c> {
    config: &'c BuildTreeConfig,
    normalize: LinePipeline,
    digraph: Regex,
    budget: NodeBudget,
    skipped: usize,
}

impl<'c> MavenRun<'c> {
    fn new(config: &'c BuildTreeConfig) -> Result<Self, BuildTreeError> {
        let log_prefix = Regex::new(r"^\s*\[(?:INFO|WARNING|WARN|ERROR|DEBUG)\] ?")?;
        Ok(Self {
            config,
            normalize: LinePipeline::new().replace_regex("strip-log-prefix", log_prefix, ""),
            digraph: Regex::new(r"(?s)digraph\b.*?\}")?,
            budget: NodeBudget::new(BuildTool::Maven, config.max_nodes),
            skipped: 0,
        })
    }

    fn parse(mut self, output: &str) -> Result<ParsedTree, BuildTreeError> {
        let text: String = output
            .lines()
            .map(|line| self.normalize.apply(line))
            .collect::<Vec<_>>()
            .join("\n");

        let blocks: Vec<&str> = self.digraph.find_iter(&text).map(|m| m.as_str()).collect();
        let Some((root_block, module_blocks)) = blocks.split_first() else {
            return Err(BuildTreeError::structure(
                BuildTool::Maven,
                ParseStage::DigraphExtract,
                "no digraph block found",
            ));
        };
        debug!(blocks = blocks.len(), "extracted maven digraph blocks");

        let root_graph = DotGraph::parse(root_block, &mut self.skipped);
        let (root_raw, root_coord) = root_graph
            .identity
            .and_then(|raw| parse_coordinate(raw).map(|c| (raw, c)))
            .ok_or_else(|| {
                BuildTreeError::structure(
                    BuildTool::Maven,
                    ParseStage::RootCoordinate,
                    "root digraph identity is not a maven coordinate",
                )
            })?;

        self.budget.take()?;
        let mut root = root_coord.to_node(&[]);
        root.package_format_version = Some(package_format_version());

        let mut ancestors = HashSet::from([root.name.clone()]);
        self.assemble(&root_graph, root_raw, &mut root, &mut ancestors)?;

        for block in module_blocks {
            let graph = DotGraph::parse(block, &mut self.skipped);
            let Some((raw, coord)) = graph
                .identity
                .and_then(|raw| parse_coordinate(raw).map(|c| (raw, c)))
            else {
                self.skipped += 1;
                continue;
            };
            if ancestors.contains(&coord.name()) {
                debug!(module = %coord.name(), "module has the root's name, skipping");
                continue;
            }

            self.budget.take()?;
            let mut module = coord.to_node(&root.from);
            ancestors.insert(module.name.clone());
            self.assemble(&graph, raw, &mut module, &mut ancestors)?;
            ancestors.remove(&module.name);
            root.dependencies.insert(module.name.clone(), module);
        }

        record_skipped(BuildTool::Maven, self.skipped);
        Ok(ParsedTree::Project(root))
    }

    /// `raw` 노드의 간선을 따라 `node`의 하위 트리를 재귀적으로 구성합니다.
    fn assemble(
        &mut self,
        graph: &DotGraph<'_>,
        raw: &str,
        node: &mut DependencyNode,
        ancestors: &mut HashSet<String>,
    ) -> Result<(), BuildTreeError> {
        let Some(targets) = graph.edges.get(raw) else {
            return Ok(());
        };
        if node.from.len() >= MAX_NESTING_DEPTH {
            debug!(node = %node, "maximum nesting depth reached, truncating");
            return Ok(());
        }

        for &target in targets {
            let Some(coord) = parse_coordinate(target) else {
                self.skipped += 1;
                continue;
            };
            if !self.config.include_test_scope && coord.is_test_scope() {
                continue;
            }
            let name = coord.name();
            if ancestors.contains(&name) {
                debug!(package = %name, "dropping cyclic edge");
                continue;
            }

            self.budget.take()?;
            let mut child = coord.to_node(&node.from);
            ancestors.insert(name.clone());
            self.assemble(graph, target, &mut child, ancestors)?;
            ancestors.remove(&name);
            node.dependencies.insert(name, child);
        }
        Ok(())
    }
}
