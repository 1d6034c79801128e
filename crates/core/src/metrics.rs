//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 파서는 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않은 경우 매크로 호출은 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `treeline_`
//! - 모듈명: `parser_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)
//!
//! # 사용 예시
//!
//! ```ignore
//! use treeline_core::metrics as m;
//!
//! metrics::counter!(m::PARSER_RUNS_TOTAL, m::LABEL_TOOL => "gradle").increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 빌드 도구 레이블 키 (maven, gradle, sbt)
pub const LABEL_TOOL: &str = "tool";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Parser 메트릭 ─────────────────────────────────────────────────

/// Parser: 파싱 호출 수 (counter, label: tool, result)
pub const PARSER_RUNS_TOTAL: &str = "treeline_parser_runs_total";

/// Parser: 구조적 파싱 실패 수 (counter, label: tool)
pub const PARSER_FAILURES_TOTAL: &str = "treeline_parser_failures_total";

/// Parser: 무시된 입력 라인 수 (counter, label: tool)
pub const PARSER_LINES_SKIPPED_TOTAL: &str = "treeline_parser_lines_skipped_total";

/// Parser: 생성된 트리 노드 수 (counter, label: tool)
pub const PARSER_NODES_EMITTED_TOTAL: &str = "treeline_parser_nodes_emitted_total";

/// Parser: 파싱 소요 시간 (histogram, 초, label: tool)
pub const PARSER_DURATION_SECONDS: &str = "treeline_parser_duration_seconds";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더 설치 직후 한 번 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        PARSER_RUNS_TOTAL,
        "Total number of dependency tree parse invocations"
    );
    describe_counter!(
        PARSER_FAILURES_TOTAL,
        "Total number of structural parse failures"
    );
    describe_counter!(
        PARSER_LINES_SKIPPED_TOTAL,
        "Total number of build tool output lines ignored as noise"
    );
    describe_counter!(
        PARSER_NODES_EMITTED_TOTAL,
        "Total number of dependency nodes emitted by parsers"
    );
    describe_histogram!(
        PARSER_DURATION_SECONDS,
        "Time to reconstruct a single dependency tree in seconds"
    );
}
