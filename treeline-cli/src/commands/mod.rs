//! Command handlers -- one module per subcommand

pub mod config;
pub mod parse;
pub mod paths;

use std::path::Path;

use tokio::io::AsyncReadExt;
use tracing::info;

use treeline_build_tree::{BuildTreeConfig, BuildTreeError, ProjectSeed, parse_file, parse_output};
use treeline_core::config::TreelineConfig;
use treeline_core::types::DependencyNode;

use crate::cli::InputArgs;
use crate::error::CliError;

/// Read the input named by `args` and turn it into a rooted dependency tree.
///
/// Gradle forests are wrapped under the seed built from
/// `--project-name` / `--project-version`.
pub(crate) async fn load_tree(
    args: &InputArgs,
    config: &TreelineConfig,
) -> Result<DependencyNode, CliError> {
    let parser_config = BuildTreeConfig::from_core(&config.parser);
    let seed = ProjectSeed::new(args.project_name.as_str(), args.project_version.as_str());
    let tool = args.tool.build_tool();

    let tree = if args.is_stdin() {
        info!(tool = ?tool, "parsing build tool output from stdin");
        let output = read_stdin(parser_config.max_input_size).await?;
        parse_output(&output, tool, &seed, &parser_config)?
    } else {
        info!(tool = ?tool, input = %args.input, "parsing build tool output");
        parse_file(Path::new(&args.input), tool, &seed, &parser_config)?
    };

    let root = tree.into_root(&seed);
    info!(
        root = %root,
        nodes = root.node_count(),
        depth = root.max_depth(),
        "dependency tree ready"
    );
    Ok(root)
}

/// Read stdin up to `max + 1` bytes so oversized input is rejected without buffering it all.
async fn read_stdin(max: usize) -> Result<String, CliError> {
    let limit = u64::try_from(max).unwrap_or(u64::MAX).saturating_add(1);
    let mut buf = Vec::new();
    tokio::io::stdin().take(limit).read_to_end(&mut buf).await?;

    if buf.len() > max {
        return Err(BuildTreeError::InputTooLarge {
            size: buf.len(),
            max,
        }
        .into());
    }

    String::from_utf8(buf)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}
