use super::{print_batch, print_warnings, Context};
use jarvault::core::{JarvaultError, JarvaultResult};
use jarvault::package::BarProgress;
use std::sync::Arc;

pub async fn run(context: &Context, specs: Vec<String>, transitive: bool) -> JarvaultResult<()> {
    let progress = Arc::new(BarProgress::new());
    let installer = context.installer(&progress)?;
    let mut failures = 0;

    for spec in &specs {
        println!("Adding {}", spec);
        if transitive {
            let report = installer.add_with_transitives(spec, &context.cancel).await?;
            progress.finish();
            print_batch(&report);
            failures += report.failed.len();
            continue;
        }

        match installer.add_dependency(spec, &context.cancel).await {
            Ok(outcome) => {
                progress.finish();
                let entry = &outcome.value;
                println!(
                    "  ✓ {}:{}:{} -> {}",
                    entry.group_id, entry.artifact_id, entry.version, entry.relative_path
                );
                print_warnings(&outcome.warnings);
            }
            Err(e) if e.is_cancellation() || specs.len() == 1 => return Err(e),
            Err(e) => {
                progress.finish();
                println!("  ❌ {}: {}", spec, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(JarvaultError::Package(format!(
            "{} of the requested dependencies could not be installed",
            failures
        )));
    }
    Ok(())
}
