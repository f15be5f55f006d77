mod convert;
mod fetch;
mod global;
mod merge;

pub use convert::ConvertArgs;
pub use fetch::FetchArgs;
pub use global::{parse_args, CommonArgs, STYLES};
pub use merge::MergeArgs;
