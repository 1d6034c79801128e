#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`BuildTreeError`, `ParseStage`)
//! - [`config`]: Parser configuration (`BuildTreeConfig`, builder)
//! - [`indent`]: Generic indentation tree builder (`IndentTree`)
//! - [`pipeline`]: Named line normalization steps (`LinePipeline`)
//! - [`parser`]: Build tool parsers (`TreeParser` trait, `MavenDotParser`, `GradleTreeParser`, `SbtTreeParser`)
//!
//! # Architecture
//!
//! ```text
//! tool stdout --> FormatDetector --> TreeParser
//!                                       |
//!            +--------------------------+--------------------------+
//!            |                          |                          |
//!      MavenDotParser           GradleTreeParser             SbtTreeParser
//!   (digraph blocks, edges)  (glyphs -> IndentTree,      (ANSI/glyphs -> IndentTree,
//!            |                omission cache)             evicted drop)
//!            |                          |                          |
//!   ParsedTree::Project        ParsedTree::Forest          ParsedTree::Project
//!            +--------------------------+--------------------------+
//!                                       |
//!                               DependencyNode (from chains)
//! ```

pub mod config;
pub mod error;
pub mod indent;
pub mod parser;
pub mod pipeline;

// --- Public API Re-exports ---

// Configuration
pub use config::{BuildTreeConfig, BuildTreeConfigBuilder};

// Error
pub use error::{BuildTreeError, ParseStage};

// Generic building blocks
pub use indent::{IndentNode, IndentTree, NodeId};
pub use pipeline::LinePipeline;

// Parser
pub use parser::{
    FormatDetector, GradleTreeParser, MavenDotParser, ParsedTree, ProjectSeed, SbtTreeParser,
    TreeParser, parse_file, parse_output,
};
