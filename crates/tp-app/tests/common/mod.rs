#![allow(dead_code)]

use std::path::PathBuf;

/// Copy a bundled scenario into a fresh temp directory so runs cached next to
/// it never land in the repository.
pub fn scenario_copy(name: &str, test: &str) -> PathBuf {
    let source = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../scenarios")
        .join(name);
    let dir = std::env::temp_dir().join(format!("tp_app_{test}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let target = dir.join(name);
    std::fs::copy(&source, &target).unwrap();
    target
}
