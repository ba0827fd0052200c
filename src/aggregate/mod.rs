//! Response aggregation.
//!
//! - pagination.rs: page descriptor for list endpoints
//! - fanout.rs: concurrent post + comments fetch for the detailed endpoint

pub mod fanout;
pub mod pagination;

pub use fanout::fetch_detailed;
pub use pagination::{paginate, PageDescriptor};
