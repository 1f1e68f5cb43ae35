//! Search-directory assembly
//!
//! The directory list a soname is looked up in has two parts: a per-file
//! runpath and an invariant tail (extra `--ldpath` directories, the
//! standard platform directories, `ld.so.conf` expansion, Android
//! directories). The invariant tail is computed once per process.

use std::path::Path;
use std::sync::Mutex;

use crate::config;
use crate::path;
use crate::path::MultiPath;
use crate::ParseOptions;

// Memoised invariant part of the search path. The options that shape it
// are captured from the first call; reset_search_cache() discards it.
static CACHED_DIRS: Mutex<Option<Vec<MultiPath>>> = Mutex::new(None);

/// Full ordered search list for one file: its runpath first, then the
/// cached invariant directories, deduplicated and existence-filtered.
pub fn searchdirs(runpath: &[MultiPath], options: &ParseOptions) -> Vec<MultiPath> {
    let mut dirs = runpath.to_vec();
    dirs.extend(cached_dirs(options));
    path::uniq_exists_path(dirs)
}

/// Drop the memoised directory list so the next call recomputes it from
/// its own options.
pub fn reset_search_cache() {
    *CACHED_DIRS.lock().unwrap() = None;
}

fn cached_dirs(options: &ParseOptions) -> Vec<MultiPath> {
    let mut cache = CACHED_DIRS.lock().unwrap();
    cache
        .get_or_insert_with(|| {
            let mut dirs = Vec::new();
            if !options.ld_library_path.is_empty() {
                dirs.extend(path::resolve_all(
                    options.ld_library_path.split(':'),
                    &options.root,
                    true,
                ));
            }
            if options.std {
                dirs.extend(std_dirs(&options.root));
            }
            if options.android {
                dirs.extend(android_dirs(&options.root));
            }

            let dirs = path::uniq_exists_path(dirs);
            log::debug!("cached {} invariant search directories", dirs.len());
            dirs
        })
        .clone()
}

// based on glibc and musl defaults
// also basically applicable to most non-Linux Unix-based systems
const STD_DIRS: &[&str] = &[
    "/lib64",
    "/lib",
    "/usr/lib64",
    "/usr/lib",
    "/usr/local/lib64",
    "/usr/local/lib",
];

// from https://android.googlesource.com/platform/bionic/+/refs/heads/main/linker/linker.cpp
const ANDROID_DIRS: &[&str] = &[
    "/system/lib64",
    "/system/lib",
    "/odm/lib64",
    "/odm/lib",
    "/vendor/lib64",
    "/vendor/lib",
];

fn std_dirs(root: &Path) -> Vec<MultiPath> {
    let mut dirs = path::resolve_all(STD_DIRS.iter().copied(), root, true);
    if let Ok(conf) = MultiPath::from_rooted("/etc/ld.so.conf", root, true) {
        dirs.extend(config::parse_ld_so_conf(conf, root));
    }
    dirs
}

fn android_dirs(root: &Path) -> Vec<MultiPath> {
    path::resolve_all(ANDROID_DIRS.iter().copied(), root, true)
}
