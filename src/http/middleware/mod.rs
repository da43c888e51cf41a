//! Tower middleware for the inbound request path.

pub mod deadline;
pub mod prefix;

pub use deadline::DeadlineLayer;
pub use prefix::StripPrefixLayer;
