//! `ctxscout smart`: bounded multi-page fetch.

use clap::Args;
use ctxscout_engine::SmartFetchRequest;

use super::{build_engine, print_json};

#[derive(Debug, Args)]
pub struct SmartArgs {
    /// Seed URL
    pub url: String,

    /// Total pages to visit, seed included (1-12)
    #[arg(long, default_value_t = 4)]
    pub max_urls: usize,

    /// Character budget per page (500-8000)
    #[arg(long, default_value_t = 2200)]
    pub max_chars: usize,

    /// Follow links to other hosts
    #[arg(long)]
    pub allow_external: bool,
}

impl From<SmartArgs> for SmartFetchRequest {
    fn from(args: SmartArgs) -> Self {
        Self {
            url: args.url,
            max_urls: args.max_urls,
            max_chars_per_url: args.max_chars,
            allow_external: args.allow_external,
        }
    }
}

pub async fn run(args: SmartArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine()?;
    let response = engine.fetch_smart(args.into()).await?;
    print_json(&response)
}
