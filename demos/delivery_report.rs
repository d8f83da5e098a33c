use std::io;

use xms::{ApiConnection, BatchDeliveryReportParams, BatchId, ServicePlanId, Token};

fn required(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let token = Token::new(required("XMS_TOKEN")?)?;
    let service_plan_id = ServicePlanId::new(required("XMS_SERVICE_PLAN_ID")?)?;
    let batch_id = BatchId::new(required("XMS_BATCH_ID")?)?;

    let mut builder = ApiConnection::builder(service_plan_id, token);
    if let Ok(endpoint) = std::env::var("XMS_ENDPOINT") {
        builder = builder.endpoint(endpoint);
    }
    let conn = builder.build_blocking()?;

    let report = conn.fetch_delivery_report(&batch_id, &BatchDeliveryReportParams::full())?;
    println!(
        "batch {}: {} message(s)",
        report.batch_id, report.total_message_count
    );
    for status in &report.statuses {
        println!(
            "  {} (code {}): {} {:?}",
            status.status, status.code, status.count, status.recipients
        );
    }

    conn.close();
    Ok(())
}
