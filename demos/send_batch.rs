use std::io;

use xms::{
    ApiConnection, BatchOptions, MtBatchTextCreate, PhoneNumber, ReportType, ServicePlanId, Token,
};

fn required(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let token = Token::new(required("XMS_TOKEN")?)?;
    let service_plan_id = ServicePlanId::new(required("XMS_SERVICE_PLAN_ID")?)?;
    let recipient = required("XMS_RECIPIENT")?;
    let message =
        std::env::var("XMS_MESSAGE").unwrap_or_else(|_| "Hello from the xms demo.".to_owned());

    let mut builder = ApiConnection::builder(service_plan_id, token);
    if let Ok(endpoint) = std::env::var("XMS_ENDPOINT") {
        builder = builder.endpoint(endpoint);
    }
    let conn = builder.start()?;

    let recipient = PhoneNumber::parse(None, &recipient)?;
    let options = BatchOptions {
        delivery_report: Some(ReportType::Summary),
        ..Default::default()
    };
    let batch = MtBatchTextCreate::new([recipient], message, options)?;

    let created = conn.create_batch(batch).await?;
    let metadata = created.metadata();
    println!("created batch {} to {:?}", metadata.id, metadata.to);

    conn.close();
    Ok(())
}
