//! Final report record and its text and JSON renderings

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::path::MultiPath;
use crate::resolve::BaseInfo;

/// The complete analysis result.
///
/// Field names follow the published JSON schema; insertion order is
/// preserved everywhere so repeated runs over the same tree produce
/// identical output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LddResults {
    /// Undefined symbols of the target, filtered, in table order.
    pub syms: Vec<String>,
    /// Sonames in DT_NEEDED order, or full encounter order for a
    /// whole-graph run.
    pub sonames: Vec<String>,

    pub symname_to_sonames: IndexMap<String, Vec<String>>,
    pub soname_paths: IndexMap<String, Vec<MultiPath>>,

    pub unneeded_sonames: Vec<String>,
    pub undefined_syms: Vec<String>,
}

impl LddResults {
    /// Assemble the report from the engine's final state.
    pub fn from_base(base: BaseInfo) -> Self {
        let undefined_syms = base
            .syms
            .iter()
            .filter(|sym| {
                base.symname_to_sonames
                    .get(sym.as_str())
                    .map_or(true, Vec::is_empty)
            })
            .cloned()
            .collect();

        Self {
            syms: base.syms,
            sonames: base.sonames,
            symname_to_sonames: base.symname_to_sonames,
            soname_paths: base.soname_paths,
            unneeded_sonames: base.unneeded_sonames,
            undefined_syms,
        }
    }
}

impl fmt::Display for LddResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sym in &self.syms {
            let Some(sonames) = self.symname_to_sonames.get(sym.as_str()) else {
                continue;
            };
            if sonames.is_empty() {
                continue;
            }
            writeln!(f, "{}: {}", sym, sonames.join(", "))?;
        }

        if !self.syms.is_empty() {
            writeln!(f)?;
        }

        for soname in &self.sonames {
            let paths = self
                .soname_paths
                .get(soname.as_str())
                .map(|paths| {
                    paths
                        .iter()
                        .map(|p| p.rooted().to_string_lossy().into_owned())
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            writeln!(f, "{}: {}", soname, paths)?;
        }

        if self.unneeded_sonames.is_empty() && self.undefined_syms.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        if !self.unneeded_sonames.is_empty() {
            writeln!(f, "UNNEEDED: {}", self.unneeded_sonames.join(", "))?;
        }
        if !self.undefined_syms.is_empty() {
            writeln!(f, "UNDEFINED: {}", self.undefined_syms.join(", "))?;
        }

        Ok(())
    }
}
