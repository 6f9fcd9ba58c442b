//! Specialty resolution, coordination classification and report selection.
//!
//! - [`resolve_specialty`]: bed/header → canonical specialty
//! - [`classify`]: specialty → display coordination
//! - [`Buckets`]: observed specialties grouped by coordination
//! - [`SelectionState`] / [`resolve_selection`]: user flags → specialty set

#![deny(unsafe_code)]

pub mod buckets;
pub mod classifier;
pub mod resolver;
pub mod selection;

pub use buckets::Buckets;
pub use classifier::{classify, home_coordination};
pub use resolver::{clean_header_text, numeric_bed, resolve_specialty};
pub use selection::{SelectionEvent, SelectionState, resolve_selection};
