use super::{print_batch, Context};
use jarvault::core::JarvaultResult;
use jarvault::package::BarProgress;
use std::path::Path;
use std::sync::Arc;

pub async fn run(context: &Context, path: &Path, overwrite: bool) -> JarvaultResult<()> {
    let progress = Arc::new(BarProgress::new());
    let installer = context.installer(&progress)?;

    println!("Importing dependencies from {}", path.display());
    let report = installer.import(path, overwrite, &context.cancel).await?;
    progress.finish();

    if report.installed.is_empty() && report.failed.is_empty() {
        println!("Nothing to import");
    }
    print_batch(&report);
    Ok(())
}
