//! ld.so.conf parsing
//!
//! An `ld.so.conf`-style file lists extra search directories, one per
//! line, and may pull in further files with `include <glob>`. Includes
//! are expanded depth-first in file order.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::path::MultiPath;

/// Work item: a directory entry ready to emit, or a config file still
/// to be expanded.
enum Item {
    Dir(MultiPath),
    Conf(MultiPath),
}

/// Expand a configuration file into its directory entries.
///
/// A missing start file yields no entries. Include cycles are broken by
/// a seen-set keyed on rooted paths; an explicit work-stack keeps deep
/// include webs from growing the call stack.
pub fn parse_ld_so_conf(start: MultiPath, root: &Path) -> Vec<MultiPath> {
    let mut out = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut work = vec![Item::Conf(start)];

    while let Some(item) = work.pop() {
        let conf = match item {
            Item::Dir(dir) => {
                out.push(dir);
                continue;
            }
            Item::Conf(conf) => conf,
        };

        if !seen.insert(conf.rooted().to_path_buf()) {
            continue;
        }

        // might not exist on non-glibc systems
        let Ok(content) = fs::read_to_string(conf.real()) else {
            continue;
        };

        let mut items = Vec::new();
        for line in content.lines() {
            let line = line.trim_matches(|c: char| c == ' ' || c == '\t' || c == '\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(pattern) = line.strip_prefix("include ") {
                include_matches(pattern.trim(), &conf, root, &mut items);
            } else if let Ok(dir) = MultiPath::from_rooted(line, root, true) {
                items.push(Item::Dir(dir));
            }
        }

        // reversed so the items pop in file order
        work.extend(items.into_iter().rev());
    }

    out
}

fn include_matches(pattern: &str, conf: &MultiPath, root: &Path, items: &mut Vec<Item>) {
    let pattern = if Path::new(pattern).is_absolute() {
        PathBuf::from(pattern)
    } else {
        conf.rooted_dir().join(pattern)
    };

    // anchor the pattern under the root before globbing on the host
    let Ok(anchored) = MultiPath::from_rooted(&pattern, root, false) else {
        return;
    };
    let Some(real_pattern) = anchored.real().to_str() else {
        return;
    };
    let Ok(matches) = glob::glob(real_pattern) else {
        return;
    };

    for path in matches.flatten() {
        items.push(Item::Conf(MultiPath::from_real(path, root)));
    }
}
