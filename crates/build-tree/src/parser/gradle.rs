//! Gradle 들여쓰기 트리 파서
//!
//! [`GradleTreeParser`]는 `gradle dependencies -q` 출력을 파싱합니다.
//! 출력에는 여러 configuration 블록이 있을 수 있으며, 첫 번째 비어 있지 않은 블록만 사용합니다.
//!
//! # 출력 형식 예시
//!
//! ```text
//! compileClasspath - Compile classpath for source set 'main'.
//! +--- org.slf4j:slf4j-api:1.7.30 -> 1.7.36
//! +--- com.google.guava:guava:31.1-jre
//! |    \--- com.google.code.findbugs:jsr305:3.0.2
//! \--- org.app:lib:1.0
//!      \--- com.google.guava:guava:31.1-jre (*)
//! ```
//!
//! # 처리 단계
//!
//! 1. 라인 필터링: 트리 마커(`+---`, `\---`)가 있는 라인만 첫 빈 줄까지 수집
//! 2. 글리프 정규화: 깊이가 선행 공백 수와 같아지도록 변환
//! 3. 초안 트리 구성: 버전 화살표(`->`) 해석, 생략 마커(`(*)`) 기록,
//!    `project :sub` 라인은 제거하고 자식을 그 자리로 끌어올림
//! 4. 생략 캐시 구성: 생략된 패키지마다 첫 번째 전체 전개를 캐시
//!    (`(c)`/`(n)` 표시 라인은 전개가 아니므로 캐시하지 않음)
//! 5. 노드 생성: 생략된 위치와 하위 트리가 비어 있는 같은 패키지 위치는
//!    캐시된 하위 트리로 채우고 `from` 체인을 계산

use std::collections::{HashMap, HashSet};

use tracing::debug;
use treeline_core::types::{BuildTool, DependencyMap, DependencyNode};

use crate::config::BuildTreeConfig;
use crate::error::{BuildTreeError, ParseStage};
use crate::indent::{IndentTree, NodeId};
use crate::parser::{
    Coordinate, MAX_NESTING_DEPTH, NodeBudget, ParsedTree, ProjectSeed, TreeParser, observe,
    package_format_version, record_skipped,
};
use crate::pipeline::LinePipeline;

/// Gradle 트리 출력 파서
pub struct GradleTreeParser {
    config: BuildTreeConfig,
}

impl GradleTreeParser {
    /// 주어진 설정으로 파서를 생성합니다.
    pub fn new(config: BuildTreeConfig) -> Self {
        Self { config }
    }
}

impl Default for GradleTreeParser {
    fn default() -> Self {
        Self::new(BuildTreeConfig::default())
    }
}

impl TreeParser for GradleTreeParser {
    fn tool(&self) -> BuildTool {
        BuildTool::Gradle
    }

    fn detect(&self, output: &str) -> bool {
        output.contains("+---") || output.contains("\\---")
    }

    fn parse(&self, output: &str, _seed: &ProjectSeed) -> Result<ParsedTree, BuildTreeError> {
        observe(BuildTool::Gradle, || {
            self.config.check_input_size(output)?;
            parse_forest(output, &self.config)
        })
    }
}

/// 트리 마커 라인 여부
fn is_tree_line(line: &str) -> bool {
    line.contains("+---") || line.contains("\\---")
}

/// 첫 번째 configuration 블록의 트리 라인을 선택합니다.
///
/// 해석되지 않은 의존성(` FAILED`)은 트리에서 제외합니다.
fn select_first_configuration<'a>(output: &'a str, skipped: &mut usize) -> Vec<&'a str> {
    let mut selected = Vec::new();
    let mut started = false;

    for line in output.lines() {
        if is_tree_line(line) {
            started = true;
            if line.trim_end().ends_with(" FAILED") {
                *skipped += 1;
                continue;
            }
            selected.push(line);
        } else if started && line.trim().is_empty() {
            break;
        }
    }
    selected
}

/// 트리 글리프를 공백 들여쓰기로 바꾸는 파이프라인
///
/// `|    \--- a:b:1` → `  a:b:1` (깊이 = 선행 공백 수)
fn glyph_pipeline() -> LinePipeline {
    LinePipeline::new()
        .replace("pipe-to-space", "|", " ")
        .replace("last-branch", "\\", "+")
        .replace("branch-to-spaces", "+---", "    ")
        .replace("collapse-indent", "     ", " ")
}

/// 트리 라인 하나의 해석 결과
#[derive(Debug, Clone, PartialEq, Eq)]
struct GradleLine {
    coordinate: Coordinate,
    /// `(*)`: 하위 트리가 앞에서 이미 전개되어 생략됨
    elided: bool,
    /// `(c)` 제약 또는 `(n)` 미해석 표시: 하위 트리를 그리지 않는 라인
    annotation: bool,
}

/// 정규화된 라인 내용을 좌표로 해석합니다.
///
/// - `g:a:1.0 -> 1.1` → 버전 `1.1`
/// - `g:a -> 1.1` → 버전 `1.1`
/// - 끝의 `(*)`, `(c)`, `(n)` 마커는 제거하고 종류별로 기록
fn parse_line(payload: &str) -> Option<GradleLine> {
    let mut text = payload.trim();
    let mut elided = false;
    let mut annotation = false;
    loop {
        if let Some(rest) = text.strip_suffix("(*)") {
            elided = true;
            text = rest.trim_end();
        } else if let Some(rest) = text
            .strip_suffix("(c)")
            .or_else(|| text.strip_suffix("(n)"))
        {
            annotation = true;
            text = rest.trim_end();
        } else {
            break;
        }
    }

    let mut segments: Vec<&str> = Vec::new();
    match text.split_once("->") {
        Some((requested, resolved)) => {
            segments.extend(requested.trim().split(':'));
            let resolved = resolved.trim();
            if segments.len() >= 3 {
                segments[2] = resolved;
            } else {
                segments.push(resolved);
            }
        }
        None => segments.extend(text.split(':')),
    }

    match segments.as_slice() {
        [group, artifact, version, ..] => Some(GradleLine {
            coordinate: Coordinate::new(group, artifact, version)?,
            elided,
            annotation,
        }),
        _ => None,
    }
}

/// 1단계 결과: 아직 `from` 체인이 없는 초안 노드
#[derive(Debug)]
struct Draft {
    coordinate: Coordinate,
    elided: bool,
    annotation: bool,
    children: Vec<Draft>,
}

impl Draft {
    /// 생략 캐시의 원본이 될 수 있는 실제 전개인지 여부
    fn is_expansion(&self) -> bool {
        !self.elided && !self.annotation
    }
}

/// 생략된 패키지의 전개 상태
enum Expansion<'d> {
    /// 아직 전체 전개를 찾지 못함
    Pending,
    /// 문서 순서상 첫 번째 전체 전개 (하위 트리가 있는 전개 우선)
    Cached(&'d Draft),
}

/// Gradle 출력을 최상위 의존성 모음으로 파싱합니다.
fn parse_forest(output: &str, config: &BuildTreeConfig) -> Result<ParsedTree, BuildTreeError> {
    let mut skipped = 0;
    let lines = select_first_configuration(output, &mut skipped);
    if lines.is_empty() {
        return Err(BuildTreeError::structure(
            BuildTool::Gradle,
            ParseStage::LineFilter,
            "no dependency tree lines found",
        ));
    }

    let pipeline = glyph_pipeline();
    let tree = IndentTree::build(lines.iter().map(|line| pipeline.apply(line)), ' ');
    debug!(lines = lines.len(), nodes = tree.len(), "normalized gradle tree");

    // 1단계: 초안 트리
    let mut builder = DraftBuilder {
        tree: &tree,
        ancestors: Vec::new(),
        omitted: HashSet::new(),
        skipped: &mut skipped,
    };
    let mut drafts = Vec::new();
    for &id in tree.roots() {
        builder.build(id, 0, &mut drafts);
    }
    let omitted = builder.omitted;

    // 2단계: 생략 캐시
    let mut cache: HashMap<String, Expansion<'_>> = omitted
        .into_iter()
        .map(|name| (name, Expansion::Pending))
        .collect();
    for draft in &drafts {
        fill_cache(draft, &mut cache);
    }

    // 3단계: 노드 생성
    let mut materializer = Materializer {
        cache: &cache,
        budget: NodeBudget::new(BuildTool::Gradle, config.max_nodes),
        ancestors: Vec::new(),
    };
    let mut dependencies = DependencyMap::new();
    for draft in &drafts {
        if let Some(node) = materializer.materialize(draft, &[])? {
            dependencies.insert(node.name.clone(), node);
        }
    }

    record_skipped(BuildTool::Gradle, skipped);
    Ok(ParsedTree::Forest {
        package_format_version: package_format_version(),
        dependencies,
    })
}

/// 들여쓰기 트리에서 초안을 만드는 1단계 상태
struct DraftBuilder<'t, 's> {
    tree: &'t IndentTree,
    ancestors: Vec<String>,
    omitted: HashSet<String>,
    skipped: &'s mut usize,
}

impl DraftBuilder<'_, '_> {
    /// 노드 하나의 초안을 `out`에 추가합니다.
    ///
    /// `project :sub` 라인은 노드를 만들지 않고 자식을 같은 위치에 추가합니다.
    /// 그 밖의 좌표가 없는 라인과 조상과 같은 이름의 라인은 하위 트리째 건너뜁니다.
    fn build(&mut self, id: NodeId, depth: usize, out: &mut Vec<Draft>) {
        let tree = self.tree;
        let Some(node) = tree.get(id) else {
            return;
        };
        if depth >= MAX_NESTING_DEPTH {
            return;
        }
        let Some(line) = parse_line(&node.payload) else {
            *self.skipped += 1;
            if node.payload.starts_with("project ") {
                debug!(line = %node.payload, "hoisting children of gradle project line");
                for &child in &node.children {
                    self.build(child, depth + 1, out);
                }
            } else {
                debug!(line = %node.payload, "skipping gradle line without coordinate");
            }
            return;
        };

        let name = line.coordinate.name();
        if self.ancestors.contains(&name) {
            return;
        }
        if line.elided {
            self.omitted.insert(name.clone());
        }

        self.ancestors.push(name);
        let mut children = Vec::new();
        for &child in &node.children {
            self.build(child, depth + 1, &mut children);
        }
        self.ancestors.pop();

        out.push(Draft {
            coordinate: line.coordinate,
            elided: line.elided,
            annotation: line.annotation,
            children,
        });
    }
}

/// 문서 순서(전위)로 순회하며 생략된 패키지의 첫 번째 전체 전개를 캐시합니다.
///
/// 하위 트리가 없는 전개가 먼저 캐시된 경우 뒤에 나오는 하위 트리가 있는 전개로 교체합니다.
fn fill_cache<'d>(draft: &'d Draft, cache: &mut HashMap<String, Expansion<'d>>) {
    if draft.is_expansion() {
        if let Some(entry) = cache.get_mut(&draft.coordinate.name()) {
            let replace = match entry {
                Expansion::Pending => true,
                Expansion::Cached(current) => {
                    current.children.is_empty() && !draft.children.is_empty()
                }
            };
            if replace {
                *entry = Expansion::Cached(draft);
            }
        }
    }
    for child in &draft.children {
        fill_cache(child, cache);
    }
}

/// 초안을 `from` 체인이 있는 노드로 변환합니다.
struct Materializer<'c, 'd> {
    cache: &'c HashMap<String, Expansion<'d>>,
    budget: NodeBudget,
    ancestors: Vec<String>,
}

impl Materializer<'_, '_> {
    fn materialize(
        &mut self,
        draft: &Draft,
        parent_from: &[String],
    ) -> Result<Option<DependencyNode>, BuildTreeError> {
        let name = draft.coordinate.name();
        if self.ancestors.contains(&name) || parent_from.len() >= MAX_NESTING_DEPTH {
            return Ok(None);
        }

        // 생략된 위치와 하위 트리가 빈 같은 패키지 위치는 캐시된 전개의 버전과 하위 트리를 사용
        let cache = self.cache;
        let source = match cache.get(&name) {
            Some(Expansion::Cached(full)) if draft.elided || draft.children.is_empty() => *full,
            _ => {
                if draft.elided {
                    debug!(package = %name, "omitted subtree never expanded, leaving empty");
                }
                draft
            }
        };

        self.budget.take()?;
        let mut node = source.coordinate.to_node(parent_from);

        self.ancestors.push(name);
        for child in &source.children {
            if let Some(child) = self.materialize(child, &node.from)? {
                node.dependencies.insert(child.name.clone(), child);
            }
        }
        self.ancestors.pop();

        Ok(Some(node))
    }
}
