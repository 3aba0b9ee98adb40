use super::{print_warnings, Context};
use jarvault::core::{JarvaultError, JarvaultResult};
use jarvault::package::{ConflictDetector, ProjectManifest};

pub fn run(context: &Context) -> JarvaultResult<()> {
    let manifest = ProjectManifest::from_config(&context.project_root, &context.config)?;
    let listed = manifest.list();
    print_warnings(&listed.warnings);

    // Files on disk that the manifest does not know about can conflict too.
    let mut entries = listed.value;
    for found in manifest.scan_installed() {
        if !entries.iter().any(|e| e.relative_path == found.relative_path) {
            entries.push(found);
        }
    }

    let report = ConflictDetector::check(&entries, &context.project_root);

    for conflict in &report.conflicts {
        let versions: Vec<&str> = conflict.versions.iter().map(String::as_str).collect();
        println!("  ⚠️  {}: {}", conflict.artifact_name, versions.join(", "));
        for file in &conflict.files {
            println!("      {}", file);
        }
    }
    for pair in &report.incompatibilities {
        println!("  ⚠️  {} + {}: {}", pair.first, pair.second, pair.reason);
    }
    for error in &report.errors {
        println!("  ❌ {}", error);
    }

    if report.conflicts.is_empty() && report.incompatibilities.is_empty() && report.valid {
        println!("✓ No conflicts found");
    }

    if !report.valid {
        return Err(JarvaultError::Package(format!(
            "{} installed dependencies are missing their files",
            report.errors.len()
        )));
    }
    Ok(())
}
