// Domain model for the compliance results reporting service

pub mod types;
pub mod pagination;
pub mod report;
pub mod control;
pub mod evaluation;
pub mod resource;

pub use types::*;
pub use pagination::{start_from_href, Paginated, START_PARAM};
pub use report::*;
pub use control::*;
pub use evaluation::*;
pub use resource::*;
