//! Descriptor ingestion and service matching
//!
//! The core of the transcoder generator: decodes a compiled
//! `FileDescriptorSet`, applies package-prefix and service-name-pattern
//! filters, and produces the sorted list of fully-qualified service names
//! the emitted filter will transcode.
//!
//! ## Pipeline
//!
//! Raw bytes pass a size guard before any decode work, then decode once
//! into an immutable [`DescriptorSource`]. Matching walks the decoded set
//! with two predicates:
//! - [`PackageFilter`]: plain prefix match on a file's package name
//! - [`ServiceFilter`]: unanchored regex search on a service's name
//!
//! Pattern compilation failures are collected into [`PatternErrors`] and
//! reported alongside the still-valid match list rather than aborting.

mod filter;
mod matcher;
mod source;

pub use filter::{PackageFilter, PatternError, PatternErrors, ServiceFilter};
pub use matcher::{find_services, match_services, MatchOutcome};
pub use source::{check_size, DescriptorSource, MAX_DESCRIPTOR_BYTES};
