use super::{print_warnings, Context};
use jarvault::core::JarvaultResult;
use jarvault::package::{ProjectManifest, UpdateChecker};

pub async fn run(context: &Context) -> JarvaultResult<()> {
    let manifest = ProjectManifest::from_config(&context.project_root, &context.config)?;
    let listed = manifest.list();
    print_warnings(&listed.warnings);

    if listed.value.is_empty() {
        println!("No dependencies to check");
        return Ok(());
    }

    println!("Checking for outdated dependencies...");
    let checker = UpdateChecker::new(context.container()?.resolver());
    let report = checker.check_updates(&listed.value, &context.cancel).await?;

    let mut outdated = 0;
    for status in report.available() {
        outdated += 1;
        let note = if status.newer { "" } else { " (not provably newer)" };
        println!(
            "  ⚠️  {}: {} → {}{}",
            status.name, status.current, status.latest, note
        );
    }
    for (name, error) in &report.failures {
        println!("  ❌ {}: Error checking version: {}", name, error);
    }

    if outdated == 0 {
        println!("✓ All dependencies are up to date");
    } else {
        println!("\n{} dependencies can be updated. Run 'jarvault update'.", outdated);
    }
    Ok(())
}
