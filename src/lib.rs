//! lddsym: symbol-level dynamic-linker simulation
//!
//! Given a dynamically linked ELF executable or shared object, this
//! library reports which shared library the runtime loader would use to
//! satisfy each of its undefined dynamic symbols. Lookup follows the
//! loader's rules: DT_RUNPATH/DT_RPATH with `$ORIGIN`, extra search
//! directories, the standard platform directories and `ld.so.conf` —
//! all confined under a configurable filesystem root. Direct
//! dependencies that contribute nothing are flagged as unneeded, and
//! symbols no reachable library defines are flagged as undefined.
//!
//! # Example
//!
//! ```no_run
//! use lddsym::ParseOptions;
//!
//! let options = ParseOptions::new("/usr/bin/ls");
//! let results = lddsym::analyze(&options).unwrap();
//!
//! for sym in &results.syms {
//!     if let Some(sonames) = results.symname_to_sonames.get(sym.as_str()) {
//!         println!("{}: {}", sym, sonames.join(", "));
//!     }
//! }
//! ```

pub mod config;
pub mod elf;
pub mod error;
pub mod path;
pub mod report;
pub mod resolve;
pub mod search;

use std::path::Path;
use std::path::PathBuf;

pub use error::ElfError;
pub use error::LddError;
pub use error::PathError;
pub use path::MultiPath;
pub use report::LddResults;
pub use search::reset_search_cache;

/// Configuration for one analysis run
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Target ELF file (a host path; relative paths resolve against the
    /// working directory).
    pub elf_path: PathBuf,
    /// Virtual filesystem root for soname resolution.
    pub root: PathBuf,
    /// Extra colon-separated search directories, tried after per-file
    /// runpaths.
    pub ld_library_path: String,
    /// Report FUNC symbols.
    pub get_func: bool,
    /// Report OBJECT symbols.
    pub get_object: bool,
    /// Report symbols that are neither FUNC nor OBJECT.
    pub get_other: bool,
    /// Include weak undefined symbols.
    pub get_weak: bool,
    /// Enumerate the full dependency graph instead of stopping once all
    /// symbols are attributed.
    pub full: bool,
    /// Search the standard Unix directories and `ld.so.conf`.
    pub std: bool,
    /// Search the Android platform directories.
    pub android: bool,
}

impl ParseOptions {
    /// Options for analysing `elf_path` with the default toggles.
    pub fn new(elf_path: impl Into<PathBuf>) -> Self {
        Self {
            elf_path: elf_path.into(),
            ..Self::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            elf_path: PathBuf::new(),
            root: PathBuf::from("/"),
            ld_library_path: String::new(),
            get_func: true,
            get_object: true,
            get_other: false,
            get_weak: false,
            full: true,
            std: true,
            android: cfg!(target_os = "android"),
        }
    }
}

/// Run the full analysis for `options`.
///
/// Fatal errors are limited to the configuration, the target file and
/// the root; failures on discovered dependencies are logged and the
/// closure continues without them.
pub fn analyze(options: &ParseOptions) -> Result<LddResults, LddError> {
    if !(options.get_func || options.get_object || options.get_other) {
        return Err(LddError::NoSymbolTypes);
    }

    let elf_path = MultiPath::from_rooted(&options.elf_path, Path::new("/"), true)?;

    let mut options = options.clone();
    options.root = path::abs_eval_symlinks(&options.root, Path::new("/"), true)?;

    let mut base = resolve::parse_base(&options, &elf_path)?;
    let searchdirs = search::searchdirs(&base.runpath, &options);
    resolve::sym_matches(&mut base, searchdirs, &options);

    Ok(LddResults::from_base(base))
}
