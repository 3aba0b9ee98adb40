use super::Context;
use jarvault::core::JarvaultResult;
use jarvault::package::ProjectManifest;
use std::path::Path;

pub fn run(context: &Context, path: &Path) -> JarvaultResult<()> {
    let manifest = ProjectManifest::from_config(&context.project_root, &context.config)?;
    let count = manifest.export(path)?;
    println!("✓ Exported {} dependencies to {}", count, path.display());
    Ok(())
}
