pub mod demo;
pub mod http;

use std::future::Future;

use crate::error::Result;
use crate::types::{FetchQuery, RankedUser};

pub use demo::DemoRankingSource;
pub use http::HttpRankingSource;

/// Where ranked users come from. Implementations return users best-first for
/// the query's window and reject with an error whose `Display` is shown to the
/// user verbatim.
pub trait RankingSource: Send + Sync + 'static {
    fn fetch(&self, query: FetchQuery) -> impl Future<Output = Result<Vec<RankedUser>>> + Send;
}
