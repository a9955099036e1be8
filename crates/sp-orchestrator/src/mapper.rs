//! Local file path to configured project mapping
//!
//! A server's `project` map pairs local directory prefixes with remote
//! working directories. Given the path of the file the user is editing,
//! the mapper finds the server whose project contains it.
//!
//! Paths are compared after normalization: separators become `/`, `.` and
//! `..` segments are resolved, and drive-letter segments (`C:`) are lower
//! cased. Nothing else is case folded.
//!
//! The first server (in catalog order) and the first prefix (in map order)
//! that contain the path win, even when a later prefix is more specific.

use crate::catalog::{ServerCatalog, ServerEntry};

/// A server whose project contains a local path
#[derive(Debug, Clone, Copy)]
pub struct ProjectMatch<'a> {
    pub entry: &'a ServerEntry,
    pub remote_dir: &'a str,
}

/// Resolves local paths against a catalog snapshot
pub struct ProjectPathMapper<'a> {
    catalog: &'a ServerCatalog,
}

impl<'a> ProjectPathMapper<'a> {
    pub fn new(catalog: &'a ServerCatalog) -> Self {
        Self { catalog }
    }

    /// Find the server owning `local_path`
    pub fn resolve(&self, local_path: &str) -> Option<ProjectMatch<'a>> {
        let path = normalize_path(local_path);

        for entry in self.catalog.entries() {
            let Some(project_map) = &entry.config.project_map else {
                continue;
            };
            for mapping in project_map.iter() {
                let prefix = normalize_path(&mapping.local_prefix);
                if is_path_inside(&path, &prefix) {
                    return Some(ProjectMatch {
                        entry,
                        remote_dir: &mapping.remote_dir,
                    });
                }
            }
        }

        None
    }
}

fn is_drive_segment(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Normalize a path for comparison.
///
/// `C:\Work\.\App\..\Lib\` becomes `c:/Work/Lib`.
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut segments: Vec<String> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if last != ".." && !is_drive_segment(last) => {
                    segments.pop();
                }
                Some(_) => segments.push("..".to_string()),
                None if absolute => {}
                None => segments.push("..".to_string()),
            },
            s if is_drive_segment(s) => segments.push(s.to_ascii_lowercase()),
            s => segments.push(s.to_string()),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Whether `child` lies strictly inside `parent`. Both must already be normalized.
pub fn is_path_inside(child: &str, parent: &str) -> bool {
    if child.starts_with('/') != parent.starts_with('/') {
        return false;
    }

    let child: Vec<&str> = child.split('/').filter(|s| !s.is_empty()).collect();
    let parent: Vec<&str> = parent.split('/').filter(|s| !s.is_empty()).collect();

    child.len() > parent.len() && child[..parent.len()] == parent[..]
}
