//! Walks a decoded descriptor set and collects qualified service names

use crate::filter::{PackageFilter, PatternErrors, ServiceFilter};
use prost_types::FileDescriptorSet;

/// Outcome of one matching pass: the sorted qualified names plus any
/// pattern compilation failures encountered while building the filter.
#[derive(Debug)]
pub struct MatchOutcome {
    pub services: Vec<String>,
    pub pattern_errors: Option<PatternErrors>,
}

/// Collect the qualified names of services admitted by both filters.
///
/// A file rejected by the package filter contributes nothing, whatever its
/// service names. Names are emitted as `package.Service`; an empty package
/// yields `.Service`. Duplicates across files are preserved.
pub fn match_services(
    set: &FileDescriptorSet,
    packages: &PackageFilter,
    services: &ServiceFilter,
) -> Vec<String> {
    let mut out = Vec::new();

    for file in &set.file {
        if !packages.matches(file.package()) {
            continue;
        }
        for service in &file.service {
            if services.matches(service.name()) {
                out.push(format!("{}.{}", file.package(), service.name()));
            }
        }
    }

    out
}

/// End-to-end matching: compile the service patterns, walk the set, sort.
///
/// The sort happens once, after all files are processed, so repeated runs
/// over the same input produce identical output.
pub fn find_services(
    set: &FileDescriptorSet,
    package_prefixes: &[String],
    service_patterns: &[String],
) -> MatchOutcome {
    let package_filter = PackageFilter::new(package_prefixes.iter().cloned());
    let (service_filter, pattern_errors) = ServiceFilter::compile(service_patterns);

    let mut services = match_services(set, &package_filter, &service_filter);
    services.sort();

    MatchOutcome {
        services,
        pattern_errors,
    }
}
