#![no_main]

use libfuzzer_sys::fuzz_target;
use treeline_build_tree::{MavenDotParser, ProjectSeed, TreeParser};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let parser = MavenDotParser::default();
        if let Ok(tree) = parser.parse(content, &ProjectSeed::default()) {
            assert!(tree.into_root(&ProjectSeed::default()).is_consistent());
        }
    }
});
