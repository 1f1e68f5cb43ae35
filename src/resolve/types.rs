//! Resolution state records

use indexmap::IndexMap;

use crate::elf::Architecture;
use crate::path::MultiPath;

/// Queue element: a soname together with the search list its lookup
/// uses.
///
/// The list travels with the task so a library found through some
/// runpath passes that runpath on to its own dependencies.
#[derive(Debug)]
pub struct SonameTask {
    pub soname: String,
    pub searchdirs: Vec<MultiPath>,
}

/// Mutable state of one analysis run. Created by `parse_base`, filled
/// in by the engine, consumed by the report assembler.
#[derive(Debug)]
pub struct BaseInfo {
    /// Undefined symbols of the target after filtering, in table order.
    pub syms: Vec<String>,
    /// DT_NEEDED entries of the target in table order. Replaced by the
    /// full encounter order when the run enumerates the whole graph.
    pub sonames: Vec<String>,
    /// Resolved runpath of the target.
    pub runpath: Vec<MultiPath>,
    pub arch: Architecture,

    /// Symbol name to the sonames defining it, in attribution order.
    pub symname_to_sonames: IndexMap<String, Vec<String>>,
    /// Soname to the on-disk files that matched it, in discovery order.
    pub soname_paths: IndexMap<String, Vec<MultiPath>>,
    /// Direct dependencies that contributed no attribution.
    pub unneeded_sonames: Vec<String>,
}
