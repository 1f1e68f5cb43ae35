//! The breadth-first closure over DT_NEEDED

use std::collections::HashSet;
use std::collections::VecDeque;
use std::path::Path;

use indexmap::IndexMap;

use crate::elf;
use crate::elf::DynSymbol;
use crate::elf::SymbolKind;
use crate::error::LddError;
use crate::error::PathError;
use crate::path;
use crate::path::MultiPath;
use crate::search;
use crate::ParseOptions;

use super::types::BaseInfo;
use super::types::SonameTask;

/// Inspect the target file and set up the initial resolution state.
///
/// The target's own runpath resolves against the host filesystem; the
/// virtual root only applies once sonames are searched.
pub fn parse_base(options: &ParseOptions, elf_path: &MultiPath) -> Result<BaseInfo, LddError> {
    let summary = elf::inspect(elf_path.real())?;

    let syms = summary
        .symbols
        .iter()
        .filter(|sym| keep_symbol(sym, options))
        .map(|sym| sym.name.clone())
        .collect();

    let runpath = run_path_dirs(summary.runpath.as_deref(), elf_path, Path::new("/"))?;

    Ok(BaseInfo {
        syms,
        sonames: summary.needed,
        runpath,
        arch: summary.arch,
        symname_to_sonames: IndexMap::new(),
        soname_paths: IndexMap::new(),
        unneeded_sonames: Vec::new(),
    })
}

fn keep_symbol(sym: &DynSymbol, options: &ParseOptions) -> bool {
    let wanted = match sym.kind {
        SymbolKind::Func => options.get_func,
        SymbolKind::Object => options.get_object,
        SymbolKind::Other => options.get_other,
    };
    wanted && !sym.defined && (options.get_weak || !sym.weak)
}

/// Resolve a raw DT_RUNPATH/DT_RPATH string: split on `:`, substitute
/// `$ORIGIN` with the directory of the declaring file (rooted form),
/// resolve each entry under `root` and keep the ones that exist.
fn run_path_dirs(
    raw: Option<&str>,
    file: &MultiPath,
    root: &Path,
) -> Result<Vec<MultiPath>, PathError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let origin = MultiPath::from_rooted(file.rooted_dir(), root, true)?;
    let origin = origin.rooted().to_string_lossy().into_owned();

    let mut dirs = Vec::new();
    for entry in raw.split(':') {
        let entry = entry.replace("$ORIGIN", &origin);
        if let Ok(dir) = MultiPath::from_rooted(&entry, root, true) {
            dirs.push(dir);
        }
    }

    Ok(path::uniq_exists_path(dirs))
}

/// Drive the BFS over DT_NEEDED, attributing each required symbol to
/// the sonames that define it.
///
/// First-match wins the first slot: attribution order is BFS discovery
/// order, so diamond dependencies surface as multiple attributions
/// instead of being hidden.
pub fn sym_matches(base: &mut BaseInfo, searchdirs: Vec<MultiPath>, options: &ParseOptions) {
    let required: HashSet<String> = base.syms.iter().cloned().collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<SonameTask> = VecDeque::new();
    for soname in &base.sonames {
        queue.push_back(SonameTask {
            soname: soname.clone(),
            searchdirs: searchdirs.clone(),
        });
        seen.insert(soname.clone());
    }

    // every direct dependency is presumed unneeded until it attributes
    let mut unneeded = base.sonames.clone();
    let mut all_sonames = Vec::new();

    while let Some(task) = queue.pop_front() {
        let SonameTask { soname, searchdirs } = task;
        if options.full {
            all_sonames.push(soname.clone());
        }

        let mut soname_needed = false;

        for candidate in candidate_paths(&soname, &searchdirs, options) {
            let summary = match elf::inspect(candidate.real()) {
                Ok(summary) => summary,
                Err(err) => {
                    log::warn!(
                        "skipping unreadable candidate {}: {}",
                        candidate.rooted().display(),
                        err
                    );
                    continue;
                }
            };

            if summary.arch != base.arch {
                continue;
            }

            let runpath = match run_path_dirs(summary.runpath.as_deref(), &candidate, &options.root)
            {
                Ok(runpath) => runpath,
                Err(err) => {
                    log::warn!(
                        "skipping candidate {} with unresolvable runpath: {}",
                        candidate.rooted().display(),
                        err
                    );
                    continue;
                }
            };

            if options.full || base.sonames.contains(&soname) {
                base.soname_paths
                    .entry(soname.clone())
                    .or_insert_with(Vec::new)
                    .push(candidate.clone());
            }

            for child in &summary.needed {
                if seen.insert(child.clone()) {
                    log::debug!("queueing {} (needed by {})", child, soname);
                    queue.push_back(SonameTask {
                        soname: child.clone(),
                        searchdirs: search::searchdirs(&runpath, options),
                    });
                }
            }

            for name in defined_names(&summary.symbols) {
                if !required.contains(&name) {
                    continue;
                }
                let list = base
                    .symname_to_sonames
                    .entry(name)
                    .or_insert_with(Vec::new);
                if !list.contains(&soname) {
                    list.push(soname.clone());
                    soname_needed = true;
                }
            }
        }

        if soname_needed {
            if let Some(index) = unneeded.iter().position(|s| s == &soname) {
                unneeded.remove(index);
            }
        }

        if !options.full && base.symname_to_sonames.len() == base.syms.len() {
            break;
        }
    }

    base.unneeded_sonames = unneeded;
    if options.full {
        base.sonames = all_sonames;
    }
}

/// Candidate files for a soname: a literal path when it contains `/`,
/// otherwise the soname joined to each search directory.
fn candidate_paths(
    soname: &str,
    searchdirs: &[MultiPath],
    options: &ParseOptions,
) -> Vec<MultiPath> {
    if soname.contains('/') {
        return match MultiPath::from_rooted(soname, &options.root, true) {
            Ok(candidate) => vec![candidate],
            Err(_) => Vec::new(),
        };
    }

    let joined = searchdirs.iter().map(|dir| dir.rooted().join(soname));
    path::uniq_exists_path(path::resolve_all(joined, &options.root, true))
}

/// Defined dynamic symbol names of a dependency, deduplicated in table
/// order. No type or weakness filtering applies on the provider side.
fn defined_names(symbols: &[DynSymbol]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for sym in symbols {
        if sym.defined && seen.insert(sym.name.clone()) {
            names.push(sym.name.clone());
        }
    }
    names
}
