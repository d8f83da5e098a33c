use std::io;

use futures::TryStreamExt;
use xms::{ApiConnection, BatchFilter, ServicePlanId, Token};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let token = std::env::var("XMS_TOKEN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "XMS_TOKEN environment variable is required",
        )
    })?;
    let service_plan_id = std::env::var("XMS_SERVICE_PLAN_ID").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "XMS_SERVICE_PLAN_ID environment variable is required",
        )
    })?;

    let service_plan_id = ServicePlanId::new(service_plan_id)?;
    let mut builder = ApiConnection::builder(service_plan_id, Token::new(token)?);
    if let Ok(endpoint) = std::env::var("XMS_ENDPOINT") {
        builder = builder.endpoint(endpoint);
    }
    let conn = builder.start()?;

    let mut filter = BatchFilter::builder().page_size(20);
    if let Ok(tag) = std::env::var("XMS_TAG") {
        filter = filter.tag(tag);
    }

    let mut pages = Box::pin(conn.fetch_batches(filter.build()?).pages());
    while let Some(page) = pages.try_next().await? {
        println!(
            "page {} ({} of {} batches)",
            page.page(),
            page.size(),
            page.total_size()
        );
        for batch in &page {
            let metadata = batch.metadata();
            println!(
                "  {} from {:?} to {} recipient(s), canceled: {}",
                metadata.id,
                metadata.from,
                metadata.to.len(),
                metadata.canceled
            );
        }
    }

    conn.close();
    Ok(())
}
