use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::parser::{ParseOptions, parse_file};
use crate::store::SymbolSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexStats {
    pub files: usize,
    pub entities: usize,
    pub truncated: usize,
    pub failed: usize,
}

pub fn find_php_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("php"))
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Parse every PHP file under `root` and commit each finished unit to the
/// sink. Files are parsed in parallel, one independent parser per file;
/// unreadable files are counted and skipped.
pub fn index_directory(
    root: &Path,
    options: &ParseOptions,
    sink: &(impl SymbolSink + ?Sized),
) -> IndexStats {
    let files = find_php_files(root);
    let entities = AtomicUsize::new(0);
    let truncated = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        match parse_file(path, options.clone()) {
            Ok(unit) => {
                entities.fetch_add(unit.arena.len(), Ordering::Relaxed);
                if unit.truncated {
                    truncated.fetch_add(1, Ordering::Relaxed);
                }
                sink.commit(unit);
            }
            Err(_) => {
                failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    });

    IndexStats {
        files: files.len(),
        entities: entities.into_inner(),
        truncated: truncated.into_inner(),
        failed: failed.into_inner(),
    }
}
