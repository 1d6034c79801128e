#![no_main]

use libfuzzer_sys::fuzz_target;
use treeline_build_tree::{ProjectSeed, SbtTreeParser, TreeParser};

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        let parser = SbtTreeParser::default();
        let seed = ProjectSeed::new("fuzz", "0.0.0");
        if let Ok(tree) = parser.parse(content, &seed) {
            assert!(tree.into_root(&seed).is_consistent());
        }
    }
});
