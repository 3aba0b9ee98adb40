use super::Context;
use jarvault::core::JarvaultResult;
use jarvault::index::IndexQuery;

pub async fn run(context: &Context, query: &str) -> JarvaultResult<()> {
    let container = context.container()?;
    let records = container
        .resolver()
        .search(&IndexQuery::Text(query.to_string()), &context.cancel)
        .await?;

    if records.is_empty() {
        println!("No artifacts found for '{}'", query);
        return Ok(());
    }
    for record in records {
        println!(
            "  {}:{}:{}  [{}]",
            record.group_id, record.artifact_id, record.latest_version, record.packaging
        );
    }
    Ok(())
}
