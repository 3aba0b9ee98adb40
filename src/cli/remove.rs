use super::{print_warnings, Context};
use jarvault::core::JarvaultResult;
use jarvault::package::Installer;

pub async fn run(context: &Context, spec: &str) -> JarvaultResult<()> {
    let installer = Installer::new(context.container()?, &context.project_root)?;
    let outcome = installer.remove_dependency(spec).await?;
    println!(
        "✓ Removed {} {} ({})",
        outcome.value.name, outcome.value.version, outcome.value.relative_path
    );
    print_warnings(&outcome.warnings);
    Ok(())
}
