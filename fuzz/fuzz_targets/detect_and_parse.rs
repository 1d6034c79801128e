#![no_main]

use libfuzzer_sys::fuzz_target;
use treeline_build_tree::{BuildTreeConfig, ProjectSeed, parse_output};

fuzz_target!(|data: &[u8]| {
    let content = String::from_utf8_lossy(data);
    let _ = parse_output(&content, None, &ProjectSeed::default(), &BuildTreeConfig::default());
});
