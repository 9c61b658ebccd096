//! Tower middleware that stamps proxied requests with `Forwarded` and `Via`.
//!
//! [`forwarded`] holds the annotator and its layer/service pair,
//! [`source`] the `by`/`for` value sources, and [`identity`] the
//! replaceable host identity lookup.

pub mod forwarded;
pub mod identity;
pub mod source;

pub use forwarded::{Annotator, ForwardedHeaders, ForwardedHeadersLayer};
pub use identity::{HostnameLookup, SystemHostname, FALLBACK_HOST_IDENTITY};
pub use source::FieldSource;
