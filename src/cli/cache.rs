use super::Context;
use jarvault::core::JarvaultResult;

pub fn clean(context: &Context) -> JarvaultResult<()> {
    let container = context.container()?;
    let result = container.cache.clean()?;
    println!(
        "✓ Removed {} cached artifacts ({})",
        result.entries_removed,
        format_bytes(result.bytes_freed)
    );
    Ok(())
}

pub fn info(context: &Context) -> JarvaultResult<()> {
    let container = context.container()?;
    let stats = container.cache.stats()?;
    println!("Cache directory: {}", container.cache.root().display());
    println!("Artifacts: {}", stats.entries);
    println!("Size: {}", format_bytes(stats.total_bytes));
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
