//! Submit a generation request and resolve it to a finished record.
//!
//! Usage: `APERTURE_API_KEY=ak_... cargo run --example generate`

use aperture_client::{ApertureClient, GenerationRequest};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aperture_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let client = ApertureClient::from_env()?;

    let mut request = GenerationRequest::new(
        "aperture-one",
        "a brutalist lighthouse at dusk, volumetric fog",
    );
    request.num_images = 2;

    let handle = client.submit(&request).await?;
    tracing::info!(task_id = handle.task_id(), "Submitted generation task");

    let record = handle.resolve().await?;
    for image in record.images() {
        println!("{}", image.url);
    }

    Ok(())
}
