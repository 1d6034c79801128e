//! `treeline parse` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use treeline_core::config::TreelineConfig;
use treeline_core::types::DependencyNode;

use crate::cli::ParseArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `parse` command.
pub async fn execute(
    args: ParseArgs,
    config: &TreelineConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let root = super::load_tree(&args.input, config).await?;
    info!(nodes = root.node_count(), "rendering dependency tree");

    writer.render(&TreeReport { root })?;
    Ok(())
}

/// Parsed dependency tree.
///
/// JSON output is the canonical tree itself.
#[derive(Serialize)]
#[serde(transparent)]
pub struct TreeReport {
    pub root: DependencyNode,
}

impl Render for TreeReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "{}@{} ({} packages, depth {})",
            self.root.name.bold(),
            self.root.version,
            self.root.node_count() - 1,
            self.root.max_depth()
        )?;
        write_children(w, &self.root, "")
    }
}

fn write_children(w: &mut dyn Write, node: &DependencyNode, prefix: &str) -> std::io::Result<()> {
    use colored::Colorize;

    let last = node.dependencies.len().saturating_sub(1);
    for (i, child) in node.dependencies.values().enumerate() {
        let (branch, indent) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };

        write!(w, "{prefix}{branch}{}@{}", child.name, child.version.green())?;
        if let Some(scope) = &child.scope {
            write!(w, " {}", format!("({scope})").yellow())?;
        }
        if let Some(dep) = &child.dep {
            write!(w, " {}", format!("[{dep}]").dimmed())?;
        }
        writeln!(w)?;

        write_children(w, child, &format!("{prefix}{indent}"))?;
    }
    Ok(())
}
