//! Conflict detection over installed files

use super::common::TestEnv;
use jarvault::package::{ConflictDetector, ProjectManifest};
use std::collections::BTreeSet;
use std::fs;

#[test]
fn test_two_versions_of_foo_conflict() {
    let env = TestEnv::new();
    fs::create_dir_all(env.lib()).unwrap();
    for file in ["foo-1.0.0.jar", "foo-2.0.0.jar", "bar-3.1.jar"] {
        fs::write(env.lib().join(file), b"").unwrap();
    }

    let manifest = ProjectManifest::new(&env.project, "lib");
    let entries = manifest.list().value;
    assert_eq!(entries.len(), 3);

    let conflicts = ConflictDetector::detect_conflicts(&entries);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].artifact_name, "foo");
    let expected: BTreeSet<String> = ["1.0.0", "2.0.0"].iter().map(|s| s.to_string()).collect();
    assert_eq!(conflicts[0].versions, expected);

    let report = ConflictDetector::check(&entries, &env.project);
    assert!(report.valid);
    assert_eq!(report.warnings.len(), 1);
}
