use super::Context;
use jarvault::core::{Coordinate, JarvaultResult};

pub async fn run(context: &Context, spec: &str) -> JarvaultResult<()> {
    let coordinate = Coordinate::parse(spec)?;
    let resolved = context
        .container()?
        .resolver()
        .resolve(&coordinate, &context.cancel)
        .await?;

    println!("{}", resolved.coordinate());
    println!("  {}", resolved.description());
    println!("  {}", resolved.download_url());
    Ok(())
}
