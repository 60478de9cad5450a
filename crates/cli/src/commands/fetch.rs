//! `ctxscout fetch`: context for a single URL.

use ctxscout_engine::FetchRequest;

use super::{build_engine, print_json};

pub async fn run(url: String) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine()?;
    let response = engine.fetch_url(FetchRequest::new(url)).await?;
    if let Some(error) = &response.error {
        tracing::warn!(url = %response.url, %error, "No context could be fetched");
    }
    print_json(&response)
}
