//! `ctxscout search`: quick search.

use clap::Args;
use ctxscout_engine::QuickSearchRequest;

use super::{build_engine, print_json};

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Query text; URLs inside it are picked up as context sources
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Maximum number of results (1-20)
    #[arg(short, long, default_value_t = 5)]
    pub limit: usize,

    /// Extra URL to pull context from (repeatable)
    #[arg(long = "url")]
    pub urls: Vec<String>,

    /// Fetch page context for the top results
    #[arg(long)]
    pub context: bool,

    /// Pages to fetch for context (0-10)
    #[arg(long, default_value_t = 2)]
    pub context_max_urls: usize,

    /// Character budget per context page (500-6000)
    #[arg(long, default_value_t = 1400)]
    pub context_max_chars: usize,

    /// Keep only results inside a referenced repository
    #[arg(long)]
    pub strict: bool,
}

impl From<SearchArgs> for QuickSearchRequest {
    fn from(args: SearchArgs) -> Self {
        Self {
            query: Some(args.query.join(" ")),
            queries: Vec::new(),
            limit: args.limit,
            urls: args.urls,
            include_context: args.context,
            context_max_urls: args.context_max_urls,
            context_max_chars: args.context_max_chars,
            strict_repo_only: args.strict,
        }
    }
}

pub async fn run(args: SearchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine()?;
    let response = engine.search_quick(args.into()).await?;
    print_json(&response)
}
