//! `ctxscout deep`: deep multi-lane search.

use clap::Args;
use ctxscout_engine::DeepSearchRequest;

use super::{build_engine, print_json};

#[derive(Debug, Args)]
pub struct DeepArgs {
    /// Main query text
    pub query: Vec<String>,

    /// Additional query (repeatable)
    #[arg(short = 'q', long = "query")]
    pub queries: Vec<String>,

    /// Results per lane and query (1-20)
    #[arg(short, long, default_value_t = 5)]
    pub limit: usize,

    /// Search category lane (repeatable); defaults to the configured lanes
    #[arg(long = "lane")]
    pub lanes: Vec<String>,

    /// Extra URL to pull context from (repeatable)
    #[arg(long = "url")]
    pub urls: Vec<String>,

    /// Skip page context
    #[arg(long)]
    pub no_context: bool,

    /// Pages to fetch for context (0-12)
    #[arg(long, default_value_t = 5)]
    pub context_max_urls: usize,

    /// Character budget per context page (500-6000)
    #[arg(long, default_value_t = 1800)]
    pub context_max_chars: usize,

    /// Keep out-of-repository results when a repository is referenced
    #[arg(long)]
    pub relaxed: bool,
}

impl From<DeepArgs> for DeepSearchRequest {
    fn from(args: DeepArgs) -> Self {
        let query = (!args.query.is_empty()).then(|| args.query.join(" "));
        Self {
            query,
            queries: args.queries,
            limit: args.limit,
            lanes: args.lanes,
            urls: args.urls,
            include_context: !args.no_context,
            context_max_urls: args.context_max_urls,
            context_max_chars: args.context_max_chars,
            strict_repo_only: !args.relaxed,
        }
    }
}

pub async fn run(args: DeepArgs) -> Result<(), Box<dyn std::error::Error>> {
    let engine = build_engine()?;
    let response = engine.search_deep(args.into()).await?;
    print_json(&response)
}
