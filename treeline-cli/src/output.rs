//! Report rendering for `--output text|json`
//!
//! Every command builds a report value (`TreeReport`, `PathsReport`, config reports)
//! and hands it to [`OutputWriter`]. Text goes through [`Render`]; JSON is the
//! report's `Serialize` form, which for `parse` is the canonical dependency tree.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Writes command reports in the format selected by `--output`.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Write a report to stdout.
    pub fn render<T: Render + Serialize>(&self, report: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        self.render_to(report, &mut stdout.lock())
    }

    /// Write a report to `w` and flush it.
    ///
    /// JSON output is pretty-printed and newline-terminated so it can be piped
    /// straight into `jq` or a file.
    pub fn render_to<T: Render + Serialize>(
        &self,
        report: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        if let OutputFormat::Json = self.format {
            serde_json::to_writer_pretty(&mut *w, report)?;
            writeln!(w)?;
        } else {
            report.render_text(w)?;
        }
        w.flush()?;
        Ok(())
    }
}

/// Human-readable form of a report.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

#[cfg(test)]
mod tests {
    use treeline_core::types::{DependencyNode, PACKAGE_FORMAT_VERSION};

    use super::*;
    use crate::commands::parse::TreeReport;
    use crate::commands::paths::PathsReport;

    fn sample_root() -> DependencyNode {
        let mut root = DependencyNode::new("com.shop:api", "2.1", &[]);
        root.package_format_version = Some(PACKAGE_FORMAT_VERSION.to_owned());

        let mut jackson = DependencyNode::new("com.fasterxml:jackson-databind", "2.15.2", &root.from);
        let core = DependencyNode::new("com.fasterxml:jackson-core", "2.15.2", &jackson.from);
        jackson.dependencies.insert(core.name.clone(), core);

        let mut junit = DependencyNode::new("junit:junit", "4.13.2", &root.from);
        junit.scope = Some("test".to_owned());

        root.dependencies.insert(jackson.name.clone(), jackson);
        root.dependencies.insert(junit.name.clone(), junit);
        root
    }

    fn render(format: OutputFormat, report: &(impl Render + Serialize)) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        OutputWriter::new(format)
            .render_to(report, &mut buffer)
            .expect("rendering into a buffer should succeed");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[test]
    fn test_tree_report_text_draws_tree() {
        let output = render(OutputFormat::Text, &TreeReport { root: sample_root() });

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "com.shop:api@2.1 (3 packages, depth 3)");
        assert_eq!(lines[1], "├── com.fasterxml:jackson-databind@2.15.2");
        assert_eq!(lines[2], "│   └── com.fasterxml:jackson-core@2.15.2");
        assert_eq!(lines[3], "└── junit:junit@4.13.2 (test)");
    }

    #[test]
    fn test_tree_report_json_is_canonical_tree() {
        let output = render(OutputFormat::Json, &TreeReport { root: sample_root() });
        assert!(output.ends_with('\n'), "json output should end with newline");

        let tree: serde_json::Value = serde_json::from_str(&output).expect("should parse JSON");
        assert_eq!(tree["name"], "com.shop:api");
        assert_eq!(tree["packageFormatVersion"], PACKAGE_FORMAT_VERSION);
        assert!(tree.get("root").is_none(), "report wrapper must be transparent");
        assert_eq!(
            tree["dependencies"]["com.fasterxml:jackson-databind"]["dependencies"]
                ["com.fasterxml:jackson-core"]["from"][2],
            "com.fasterxml:jackson-core@2.15.2"
        );
        assert_eq!(tree["dependencies"]["junit:junit"]["scope"], "test");
    }

    #[test]
    fn test_paths_report_both_formats() {
        let report = PathsReport::collect(&sample_root(), "com.fasterxml:jackson-core");

        let text = render(OutputFormat::Text, &report);
        assert!(text.starts_with("1 path(s) to com.fasterxml:jackson-core (2.15.2)"));
        assert!(text.contains(
            "com.shop:api@2.1 > com.fasterxml:jackson-databind@2.15.2 > com.fasterxml:jackson-core@2.15.2"
        ));

        let json: serde_json::Value =
            serde_json::from_str(&render(OutputFormat::Json, &report)).expect("should parse JSON");
        assert_eq!(json["root"], "com.shop:api@2.1");
        assert_eq!(json["paths"][0].as_array().map(Vec::len), Some(3));
    }
}
