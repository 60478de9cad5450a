//! Pure text and URL algorithms behind the ctxscout engines.
//!
//! Nothing in this crate touches the network. Every function is
//! deterministic over its inputs so the orchestration layer can rely on
//! stable ordering regardless of fetch completion order.

pub mod compact;
pub mod html;
pub mod links;
pub mod merge;
pub mod split;
pub mod urls;

pub use compact::{collapse_whitespace, compact_text};
pub use html::strip_html_to_text;
pub use links::{extract_links, identity_key};
pub use merge::{RowAccumulator, context_items_to_results, merge_context_items, merge_result_rows};
pub use split::{SplitQuery, collect_queries, split_query_and_urls};
pub use urls::{dedupe_urls, normalize_url, validate_http_url};
