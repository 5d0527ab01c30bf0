//! URL handling module for Sitewalk
//!
//! This module decides which discovered URLs belong to the crawl:
//! canonicalization for the visited set, site-host extraction, and the
//! eligibility policy applied to every candidate link.

mod domain;
mod normalize;
mod policy;

// Re-export main functions
pub use domain::{host_in_site, site_host};
pub use normalize::{canonicalize, parse_seed};
pub use policy::{has_ignored_extension, is_eligible, UrlPolicy};
