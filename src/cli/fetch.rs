use super::{print_warnings, Context};
use jarvault::core::{Coordinate, JarvaultError, JarvaultResult};
use jarvault::package::{DownloadResult, TransitiveFetcher};
use std::path::Path;

pub async fn run(context: &Context, spec: &str, dest: &Path, transitive: bool) -> JarvaultResult<()> {
    let coordinate = Coordinate::parse(spec)?;
    let fetcher = TransitiveFetcher::from_container(&context.container()?);

    let results = if transitive {
        let result = fetcher
            .fetch_with_transitives(&coordinate, dest, &context.cancel)
            .await?;
        result.all().cloned().collect::<Vec<_>>()
    } else {
        vec![fetcher.fetch_artifact(&coordinate, dest, &context.cancel).await?]
    };

    let mut failures = 0;
    for result in &results {
        print_result(result);
        if !result.is_success() {
            failures += 1;
        }
    }

    if failures > 0 && !results[0].is_success() {
        return Err(JarvaultError::Package(format!("Could not fetch {}", spec)));
    }
    Ok(())
}

fn print_result(result: &DownloadResult) {
    match (&result.resolved, &result.path, &result.error) {
        (Some(resolved), Some(path), None) => {
            let source = if result.from_cache { "cached" } else { "downloaded" };
            println!("  ✓ {} -> {} ({})", resolved, path.display(), source);
            print_warnings(&result.warnings);
        }
        (_, _, error) => println!(
            "  ❌ {}: {}",
            result.requested,
            error.as_deref().unwrap_or("unknown error")
        ),
    }
}
