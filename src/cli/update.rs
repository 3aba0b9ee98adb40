use super::{print_batch, Context};
use jarvault::core::JarvaultResult;
use jarvault::package::BarProgress;
use std::sync::Arc;

pub async fn run(context: &Context) -> JarvaultResult<()> {
    let progress = Arc::new(BarProgress::new());
    let installer = context.installer(&progress)?;

    println!("Updating dependencies...");
    let report = installer.update_all(&context.cancel).await?;
    progress.finish();

    if report.installed.is_empty() && report.failed.is_empty() {
        println!("✓ All dependencies are up to date");
    }
    print_batch(&report);
    Ok(())
}
