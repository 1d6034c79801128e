#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use treeline_build_tree::{BuildTreeConfig, GradleTreeParser, ProjectSeed, TreeParser};

/// 퍼저용 구조적 입력: 유효한 글리프로 그려진 Gradle 트리
#[derive(Arbitrary, Debug)]
struct FuzzTree {
    /// 트리 라인 목록 (최대 64개로 제한)
    lines: Vec<FuzzLine>,
}

#[derive(Arbitrary, Debug)]
struct FuzzLine {
    /// 이전 라인 대비 깊이 변화
    step: FuzzStep,
    /// 좌표 선택 (작은 범위로 충돌 유도)
    artifact: u8,
    requested: u8,
    resolved: Option<u8>,
    marker: FuzzMarker,
}

#[derive(Arbitrary, Debug)]
enum FuzzStep {
    Deeper,
    Same,
    Up(u8),
}

#[derive(Arbitrary, Debug)]
enum FuzzMarker {
    None,
    Omitted,
    Constraint,
    NotResolved,
    Failed,
}

impl FuzzTree {
    fn render(&self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for line in self.lines.iter().take(64) {
            depth = match line.step {
                FuzzStep::Deeper if !out.is_empty() => depth + 1,
                FuzzStep::Up(n) => depth.saturating_sub(usize::from(n % 4)),
                _ => depth,
            };
            out.push_str(&"|    ".repeat(depth));
            out.push_str("+--- ");
            out.push_str(&format!("g:a{}:{}", line.artifact % 8, line.requested % 4));
            if let Some(resolved) = line.resolved {
                out.push_str(&format!(" -> {}", resolved % 4));
            }
            out.push_str(match line.marker {
                FuzzMarker::None => "",
                FuzzMarker::Omitted => " (*)",
                FuzzMarker::Constraint => " (c)",
                FuzzMarker::NotResolved => " (n)",
                FuzzMarker::Failed => " FAILED",
            });
            out.push('\n');
        }
        out
    }
}

fuzz_target!(|input: FuzzTree| {
    let output = input.render();
    let config = BuildTreeConfig {
        max_nodes: 20_000,
        ..Default::default()
    };
    let parser = GradleTreeParser::new(config);

    if let Ok(tree) = parser.parse(&output, &ProjectSeed::default()) {
        let root = tree.into_root(&ProjectSeed::default());
        assert!(root.is_consistent(), "ancestry invariant broken for:\n{output}");
    }
});
