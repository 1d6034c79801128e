//! SBT 들여쓰기 트리 파서
//!
//! [`SbtTreeParser`]는 `sbt dependency-tree` 콘솔 출력을 파싱합니다.
//! ANSI 색상 코드와 `[info]` 로그 접두어를 제거하고 트리 글리프를 탭 들여쓰기로 바꾼 뒤
//! [`IndentTree`]로 구성하고, 각 노드의 `group:artifact:version` 페이로드를 해석합니다.
//!
//! # 출력 형식 예시
//!
//! ```text
//! [info] default:my-app_2.13:0.1.0 [S]
//! [info]   +-com.typesafe:config:1.4.2
//! [info]   +-org.typelevel:cats-core_2.13:2.9.0 [S]
//! [info]   | +-org.typelevel:cats-kernel_2.13:2.9.0 [S]
//! [info]   |
//! [info]   +-org.slf4j:slf4j-api:1.7.30 (evicted by: 1.7.36)
//! ```
//!
//! SBT는 Gradle과 달리 하위 트리를 생략하지 않고, 해석에서 밀려난 버전을
//! `(evicted by: ...)`로 표시합니다. 이런 노드는 하위 트리와 함께 버립니다.

use tracing::debug;
use treeline_core::types::{BuildTool, DependencyNode};

use crate::config::BuildTreeConfig;
use crate::error::{BuildTreeError, ParseStage};
use crate::indent::{IndentNode, IndentTree, NodeId};
use crate::parser::{
    Coordinate, MAX_NESTING_DEPTH, NodeBudget, ParsedTree, ProjectSeed, TreeParser, observe,
    record_skipped,
};
use crate::pipeline::LinePipeline;

const BRANCH: &str = "+-";
const EVICTED_MARKER: &str = "(evicted by:";

/// SBT 트리 출력 파서
pub struct SbtTreeParser {
    config: BuildTreeConfig,
}

impl SbtTreeParser {
    /// 주어진 설정으로 파서를 생성합니다.
    pub fn new(config: BuildTreeConfig) -> Self {
        Self { config }
    }
}

impl Default for SbtTreeParser {
    fn default() -> Self {
        Self::new(BuildTreeConfig::default())
    }
}

impl TreeParser for SbtTreeParser {
    fn tool(&self) -> BuildTool {
        BuildTool::Sbt
    }

    fn detect(&self, output: &str) -> bool {
        output.contains(BRANCH) && output.contains("[info]")
    }

    fn parse(&self, output: &str, seed: &ProjectSeed) -> Result<ParsedTree, BuildTreeError> {
        observe(BuildTool::Sbt, || {
            self.config.check_input_size(output)?;
            seed.validate()?;
            SbtRun::new(&self.config)?.parse(output, seed)
        })
    }
}

/// 트리 라인과 그 직전의 프로젝트 헤더 라인을 선택합니다.
///
/// 다음 라인이 트리 라인이고 충분히 긴(10자 초과) 라인은 헤더나 줄바꿈된 라인으로 보고 유지합니다.
fn select_tree_lines(output: &str) -> Vec<&str> {
    let lines: Vec<&str> = output.lines().collect();
    lines
        .iter()
        .enumerate()
        .filter(|&(idx, line)| {
            line.contains(BRANCH)
                || (line.len() > 10 && lines.get(idx + 1).is_some_and(|next| next.contains(BRANCH)))
        })
        .map(|(_, line)| *line)
        .collect()
}

/// 트리 글리프를 탭으로 바꿉니다.
///
/// `+-` 앞의 여백은 2칸 단위 셀(`"| "`, `"  "`)로 이루어지며, 셀 하나와 `+-` 하나가 각각 탭이 됩니다.
/// 마지막 자식 아래의 여백(`"  "`)도 셀로 세므로 형제 관계가 유지됩니다.
/// 글리프가 없는 라인(프로젝트 헤더)은 깊이 0으로 그대로 두고,
/// 세로선(`|`)만 있는 구분 라인은 빈 라인으로 만듭니다.
fn glyphs_to_tabs(line: &str) -> String {
    let Some(branch) = line.find(BRANCH) else {
        if line.chars().all(|c| c == '|' || c.is_whitespace()) {
            return String::new();
        }
        return line.to_owned();
    };
    let (gutter, rest) = line.split_at(branch);
    let payload = &rest[BRANCH.len()..];

    if !gutter.chars().all(|c| c == ' ' || c == '|') {
        // 알 수 없는 접두어는 버리고 첫 글리프부터 사용
        return format!("\t{payload}");
    }

    let mut normalized = "\t".repeat(gutter.len().div_ceil(2) + 1);
    normalized.push_str(payload);
    normalized
}

/// 탭 들여쓰기 페이로드를 좌표로 해석합니다.
///
/// 마지막 `:` 세그먼트가 버전, 앞의 두 세그먼트가 `groupId:artifactId`입니다.
fn parse_payload(payload: &str) -> Option<Coordinate> {
    let segments: Vec<&str> = payload.split(':').collect();
    if segments.len() < 3 {
        return None;
    }
    let clean = |s: &str| s.replace('\t', "").trim().to_owned();
    let version = segments.last().map(|s| clean(s))?;
    Coordinate::new(&clean(segments[0]), &clean(segments[1]), &version)
}

/// 노드를 버려야 하는지 여부 (해석에서 밀려난 버전, 플러그인 출력)
fn is_ignored(payload: &str) -> bool {
    payload.contains(EVICTED_MARKER) || payload.contains("php")
}

/// 파싱 호출 하나의 상태
struct SbtRun {
    normalize: LinePipeline,
    budget: NodeBudget,
    ancestors: Vec<String>,
    skipped: usize,
}

impl SbtRun {
    fn new(config: &BuildTreeConfig) -> Result<Self, BuildTreeError> {
        let normalize = LinePipeline::new()
            .replace_regex("strip-ansi", regex::Regex::new(r"\x1b\[[0-9;]*m")?, "")
            .replace_regex("strip-log-prefix", regex::Regex::new(r"\[info\] ?")?, "")
            .replace("strip-scala-tag", " [S]", "")
            .replace("strip-empty-tag", "[]", "")
            .step("tree-glyphs-to-tabs", glyphs_to_tabs);

        Ok(Self {
            normalize,
            budget: NodeBudget::new(BuildTool::Sbt, config.max_nodes),
            ancestors: Vec::new(),
            skipped: 0,
        })
    }

    fn parse(mut self, output: &str, seed: &ProjectSeed) -> Result<ParsedTree, BuildTreeError> {
        let lines = select_tree_lines(output);
        if lines.is_empty() {
            return Err(BuildTreeError::structure(
                BuildTool::Sbt,
                ParseStage::LineFilter,
                "no dependency tree lines found",
            ));
        }

        let tree = IndentTree::build(lines.iter().map(|line| self.normalize.apply(line)), '\t');
        debug!(lines = lines.len(), nodes = tree.len(), "normalized sbt tree");

        self.budget.take()?;
        let mut root = DependencyNode::new(seed.name.as_str(), seed.version.as_str(), &[]);
        self.ancestors.push(root.name.clone());

        // 헤더(깊이 0)가 하나면 프로젝트 자신이므로 그 자식을 루트 의존성으로 올림
        let headers: Vec<NodeId> = tree
            .roots()
            .iter()
            .copied()
            .filter(|&id| {
                tree.get(id)
                    .is_some_and(|n| n.depth == 0 && !is_ignored(&n.payload) && parse_payload(&n.payload).is_some())
            })
            .collect();
        let project = match headers.as_slice() {
            [single] => Some(*single),
            _ => None,
        };

        for &id in tree.roots() {
            if Some(id) == project {
                for (child_id, child) in tree.children(id) {
                    self.attach(&tree, child_id, child, &mut root)?;
                }
            } else if let Some(node) = tree.get(id) {
                self.attach(&tree, id, node, &mut root)?;
            }
        }

        record_skipped(BuildTool::Sbt, self.skipped);
        Ok(ParsedTree::Project(root))
    }

    /// 들여쓰기 노드 하나를 `parent`의 의존성으로 추가하고 자식을 재귀적으로 처리합니다.
    fn attach(
        &mut self,
        tree: &IndentTree,
        id: NodeId,
        node: &IndentNode,
        parent: &mut DependencyNode,
    ) -> Result<(), BuildTreeError> {
        if is_ignored(&node.payload) {
            debug!(line = %node.payload, "dropping evicted sbt entry");
            return Ok(());
        }
        let Some(coordinate) = parse_payload(&node.payload) else {
            self.skipped += 1;
            return Ok(());
        };
        let name = coordinate.name();
        if self.ancestors.contains(&name) || parent.from.len() >= MAX_NESTING_DEPTH {
            return Ok(());
        }

        self.budget.take()?;
        let mut dependency = coordinate.to_node(&parent.from);
        self.ancestors.push(name.clone());
        for (child_id, child) in tree.children(id) {
            self.attach(tree, child_id, child, &mut dependency)?;
        }
        self.ancestors.pop();

        parent.dependencies.insert(name, dependency);
        Ok(())
    }
}
