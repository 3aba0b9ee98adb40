use super::{print_warnings, Context};
use jarvault::core::JarvaultResult;
use jarvault::package::{Lockfile, ProjectManifest};

pub async fn run(context: &Context) -> JarvaultResult<()> {
    let manifest = ProjectManifest::from_config(&context.project_root, &context.config)?;
    let previous = Lockfile::load(&manifest.lock_path()).ok();
    let outcome = manifest.run_blocking(ProjectManifest::write_lock).await?;

    println!(
        "✓ Locked {} dependencies in {}",
        outcome.value.len(),
        manifest.lock_path().display()
    );
    for entry in outcome.value.iter().filter(|e| e.checksum.is_none()) {
        println!("  ⚠️  {} {} has no installed file", entry.name, entry.version);
    }
    if let Some(previous) = previous {
        for entry in &outcome.value {
            let changed = previous.dependencies.iter().any(|old| {
                old.group_id == entry.group_id
                    && old.artifact_id == entry.artifact_id
                    && (old.version != entry.version || old.checksum != entry.checksum)
            });
            if changed {
                println!("  ~ {} {} changed since the last lock", entry.name, entry.version);
            }
        }
    }
    print_warnings(&outcome.warnings);
    Ok(())
}
