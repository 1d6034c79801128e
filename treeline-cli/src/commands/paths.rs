//! `treeline paths` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use treeline_core::config::TreelineConfig;
use treeline_core::types::DependencyNode;

use crate::cli::PathsArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `paths` command.
///
/// Renders the report even when the package is absent, then fails with a
/// command error so scripts can branch on the exit code.
pub async fn execute(
    args: PathsArgs,
    config: &TreelineConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let root = super::load_tree(&args.input, config).await?;
    let report = PathsReport::collect(&root, &args.package);
    info!(package = %args.package, paths = report.paths.len(), "collected dependency paths");

    writer.render(&report)?;

    if report.paths.is_empty() {
        return Err(CliError::Command(format!(
            "package {} not found in dependency tree of {}",
            args.package, report.root
        )));
    }
    Ok(())
}

/// Every from-root path to one package.
#[derive(Serialize)]
pub struct PathsReport {
    /// `name@version` of the project root
    pub root: String,
    /// Requested package name
    pub package: String,
    /// Distinct resolved versions, in first-seen order
    pub versions: Vec<String>,
    /// `from` chains, root first
    pub paths: Vec<Vec<String>>,
}

impl PathsReport {
    pub fn collect(root: &DependencyNode, package: &str) -> Self {
        let paths: Vec<Vec<String>> = root
            .find_paths(package)
            .into_iter()
            .map(<[String]>::to_vec)
            .collect();

        let mut versions: Vec<String> = Vec::new();
        for node in root.walk().filter(|n| n.name == package) {
            if !versions.contains(&node.version) {
                versions.push(node.version.clone());
            }
        }

        Self {
            root: root.coordinate_key(),
            package: package.to_owned(),
            versions,
            paths,
        }
    }
}

impl Render for PathsReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if self.paths.is_empty() {
            writeln!(
                w,
                "{}",
                format!("No paths to {} from {}.", self.package, self.root).yellow()
            )?;
            return Ok(());
        }

        writeln!(
            w,
            "{} path(s) to {} ({})",
            self.paths.len(),
            self.package.bold(),
            self.versions.join(", ")
        )?;
        for path in &self.paths {
            writeln!(w, "  {}", path.join(" > "))?;
        }
        Ok(())
    }
}
