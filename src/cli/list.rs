use super::{print_warnings, Context};
use jarvault::core::JarvaultResult;
use jarvault::package::ProjectManifest;

pub fn run(context: &Context) -> JarvaultResult<()> {
    let manifest = ProjectManifest::from_config(&context.project_root, &context.config)?;
    let listed = manifest.list();

    if listed.value.is_empty() {
        println!("No dependencies installed");
    } else {
        println!("Installed dependencies:");
        for entry in &listed.value {
            let group = if entry.group_id.is_empty() {
                "?"
            } else {
                entry.group_id.as_str()
            };
            println!(
                "  {}:{} {}  ({})",
                group, entry.artifact_id, entry.version, entry.relative_path
            );
        }
    }
    print_warnings(&listed.warnings);
    Ok(())
}
