//! 라인 정규화 파이프라인
//!
//! 빌드 도구 출력 라인을 순서가 있는 순수 변환 단계(`&str -> String`)로 정규화합니다.
//! 각 단계에는 이름이 붙어 있어 개별적으로 테스트하고 로그로 추적할 수 있습니다.
//!
//! 정규식 기반 단계는 컴파일된 패턴을 클로저가 소유합니다. 파이프라인은
//! 파싱 호출마다 새로 구성되며, 프로세스 전역 상태를 두지 않습니다.
//!
//! # 예시
//!
//! ```
//! use treeline_build_tree::pipeline::LinePipeline;
//!
//! let pipeline = LinePipeline::new()
//!     .replace("pipe", "|", " ")
//!     .step("trim", |line| line.trim().to_owned());
//!
//! assert_eq!(pipeline.apply("  | foo "), "foo");
//! assert_eq!(pipeline.step_names(), ["pipe", "trim"]);
//! ```

use regex::Regex;

type StepFn = Box<dyn Fn(&str) -> String + Send + Sync>;

struct Step {
    name: &'static str,
    run: StepFn,
}

/// 이름이 붙은 라인 변환 단계 목록
#[derive(Default)]
pub struct LinePipeline {
    steps: Vec<Step>,
}

impl LinePipeline {
    /// 빈 파이프라인을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 임의의 변환 단계를 추가합니다.
    pub fn step<F>(mut self, name: &'static str, run: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.steps.push(Step {
            name,
            run: Box::new(run),
        });
        self
    }

    /// 리터럴 치환 단계를 추가합니다.
    pub fn replace(self, name: &'static str, from: &'static str, to: &'static str) -> Self {
        self.step(name, move |line| line.replace(from, to))
    }

    /// 정규식 매칭 부분을 `to`로 치환하는 단계를 추가합니다.
    pub fn replace_regex(self, name: &'static str, pattern: Regex, to: &'static str) -> Self {
        self.step(name, move |line| pattern.replace_all(line, to).into_owned())
    }

    /// 모든 단계를 순서대로 적용합니다.
    pub fn apply(&self, line: &str) -> String {
        let mut current = line.to_owned();
        for step in &self.steps {
            current = (step.run)(&current);
        }
        current
    }

    /// 단계 이름 목록 (적용 순서)
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name).collect()
    }

    /// 단계 수
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// 단계가 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl std::fmt::Debug for LinePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinePipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pipeline_is_identity() {
        let pipeline = LinePipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.apply("  as is "), "  as is ");
    }

    #[test]
    fn steps_apply_in_order() {
        let pipeline = LinePipeline::new()
            .replace("backslash", "\\", "+")
            .replace("branch", "+---", "    ");
        // backslash가 먼저 +로 바뀌어야 branch 단계가 매칭됨
        assert_eq!(pipeline.apply("\\--- a:b:1"), "     a:b:1");
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn regex_step_replaces_all_matches() {
        let ansi = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
        let pipeline = LinePipeline::new().replace_regex("ansi", ansi, "");
        assert_eq!(pipeline.apply("\x1b[0m[\x1b[32minfo\x1b[0m] x"), "[info] x");
    }

    #[test]
    fn debug_lists_step_names() {
        let pipeline = LinePipeline::new().replace("a", "a", "b");
        assert_eq!(format!("{pipeline:?}"), r#"LinePipeline { steps: ["a"] }"#);
    }
}
