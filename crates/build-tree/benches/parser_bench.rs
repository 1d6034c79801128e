//! 빌드 도구 출력 파서 벤치마크
//!
//! Maven DOT, Gradle 트리, SBT 트리 파싱 성능을 측정합니다.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use treeline_build_tree::{
    BuildTreeConfig, GradleTreeParser, IndentTree, MavenDotParser, ProjectSeed, SbtTreeParser,
    TreeParser,
};

/// 소규모 Maven digraph (5개 엣지)
const SMALL_MAVEN: &str = r#"[INFO] digraph "com.app:root:jar:1.0" {
[INFO] 	"com.app:root:jar:1.0" -> "org.slf4j:slf4j-api:jar:2.0.9:compile" ;
[INFO] 	"com.app:root:jar:1.0" -> "com.google.guava:guava:jar:32.1.2-jre:compile" ;
[INFO] 	"com.google.guava:guava:jar:32.1.2-jre:compile" -> "com.google.guava:failureaccess:jar:1.0.1:compile" ;
[INFO] 	"com.google.guava:guava:jar:32.1.2-jre:compile" -> "com.google.code.findbugs:jsr305:jar:3.0.2:compile" ;
[INFO] 	"com.app:root:jar:1.0" -> "junit:junit:jar:4.13.2:test" ;
[INFO]  }
"#;

/// 대규모 Maven digraph 생성 (width개 직접 의존성, 각각 depth 깊이 체인)
fn generate_maven(width: usize, depth: usize) -> String {
    let mut out = String::from("digraph \"com.app:root:jar:1.0\" {\n");
    for i in 0..width {
        let mut parent = "com.app:root:jar:1.0".to_owned();
        for d in 0..depth {
            let child = format!("org.lib{i}:art{d}:jar:1.{d}.0:compile");
            out.push_str(&format!("\t\"{parent}\" -> \"{child}\" ;\n"));
            parent = child;
        }
    }
    out.push_str(" }\n");
    out
}

/// 생략 표시가 섞인 대규모 Gradle 트리 생성
///
/// 공통 라이브러리 서브트리를 한 번 전개하고 이후에는 `(*)`로 참조합니다.
fn generate_gradle(modules: usize) -> String {
    let mut out = String::from("compileClasspath - Compile classpath for source set 'main'.\n");
    out.push_str("+--- org.shared:core:1.0 -> 1.2\n");
    for i in 0..10 {
        out.push_str(&format!("|    +--- org.shared:util{i}:1.0\n"));
        out.push_str(&format!("|    |    \\--- org.shared:leaf{i}:1.0\n"));
    }
    out.push_str("|    \\--- org.shared:last:1.0\n");
    for i in 0..modules {
        out.push_str(&format!("+--- com.app:module{i}:2.{i}\n"));
        out.push_str(&format!("|    +--- com.app:helper{i}:1.0 -> 1.1\n"));
        out.push_str("|    \\--- org.shared:core:1.0 -> 1.2 (*)\n");
    }
    out.push_str("\\--- org.slf4j:slf4j-api:2.0.9\n\n");
    out
}

/// 대규모 SBT 트리 생성
fn generate_sbt(width: usize) -> String {
    let mut out = String::from("[info] com.app:app_2.13:1.0 [S]\n");
    for i in 0..width {
        out.push_str(&format!("[info]   +-org.lib:lib{i}_2.13:1.{i} [S]\n"));
        out.push_str(&format!("[info]   | +-org.lib:dep{i}:0.{i}\n"));
        out.push_str(&format!("[info]   | | +-org.lib:inner{i}:0.1\n"));
        out.push_str("[info]   | |\n");
        out.push_str(&format!("[info]   | +-org.lib:old{i}:0.1 (evicted by: 0.2)\n"));
        out.push_str("[info]   |\n");
    }
    out.push_str("[info]   +-org.slf4j:slf4j-api:2.0.9\n");
    out
}

fn bench_maven_parsing(c: &mut Criterion) {
    let parser = MavenDotParser::new(BuildTreeConfig::default());
    let seed = ProjectSeed::default();
    let mut group = c.benchmark_group("maven_dot_parsing");

    // 소규모
    group.throughput(Throughput::Elements(5));
    group.bench_function("small_5_edges", |b| {
        b.iter(|| parser.parse(black_box(SMALL_MAVEN), &seed).unwrap())
    });

    for (width, depth) in [(50, 4), (200, 8)] {
        let output = generate_maven(width, depth);
        group.throughput(Throughput::Elements((width * depth) as u64));
        group.bench_with_input(
            BenchmarkId::new("chains", format!("{width}x{depth}")),
            &output,
            |b, output| b.iter(|| parser.parse(black_box(output), &seed).unwrap()),
        );
    }

    group.finish();
}

fn bench_gradle_parsing(c: &mut Criterion) {
    let parser = GradleTreeParser::new(BuildTreeConfig::default());
    let seed = ProjectSeed::default();
    let mut group = c.benchmark_group("gradle_tree_parsing");

    for modules in [10, 100, 500] {
        let output = generate_gradle(modules);
        group.throughput(Throughput::Bytes(output.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("with_omissions", modules),
            &output,
            |b, output| b.iter(|| parser.parse(black_box(output), &seed).unwrap()),
        );
    }

    group.finish();
}

fn bench_sbt_parsing(c: &mut Criterion) {
    let parser = SbtTreeParser::new(BuildTreeConfig::default());
    let seed = ProjectSeed::new("app", "1.0");
    let mut group = c.benchmark_group("sbt_tree_parsing");

    for width in [10, 200] {
        let output = generate_sbt(width);
        group.throughput(Throughput::Bytes(output.len() as u64));
        group.bench_with_input(BenchmarkId::new("libraries", width), &output, |b, output| {
            b.iter(|| parser.parse(black_box(output), &seed).unwrap())
        });
    }

    group.finish();
}

fn bench_indent_tree(c: &mut Criterion) {
    let lines: Vec<String> = (0..5000)
        .map(|i| format!("{}node{i}", "\t".repeat(i % 7)))
        .collect();
    let mut group = c.benchmark_group("indent_tree");

    // 탭 들여쓰기 5000줄
    group.throughput(Throughput::Elements(lines.len() as u64));
    group.bench_function("build_5000_lines", |b| {
        b.iter(|| IndentTree::build(black_box(lines.iter().map(String::as_str)), '\t'))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_maven_parsing,
    bench_gradle_parsing,
    bench_sbt_parsing,
    bench_indent_tree
);
criterion_main!(benches);
