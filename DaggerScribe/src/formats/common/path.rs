//! Case-insensitive lookups inside game data folders
//!
//! Installs copied from DOS media are upper case, but unpacked or repacked
//! ones are often lower case; name comparisons ignore ASCII case.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Direct child of `dir` whose file name equals `name` ignoring ASCII case.
///
/// An exact match wins over a case-folded one.
pub fn find_child<P: AsRef<Path>>(dir: P, name: &str) -> Option<PathBuf> {
    let dir = dir.as_ref();
    let exact = dir.join(name);
    if exact.exists() {
        return Some(exact);
    }
    children(dir).find(|p| {
        p.file_name()
            .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case(name))
    })
}

/// Sibling of `path` with the same stem and extension `ext`, both ignoring ASCII case.
pub fn find_sibling_with_extension(path: &Path, ext: &str) -> Option<PathBuf> {
    let exact = path.with_extension(ext);
    if exact.is_file() {
        return Some(exact);
    }
    let stem = path.file_stem()?.to_string_lossy();
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    children(dir).find(|p| {
        p.is_file()
            && p.file_stem()
                .is_some_and(|s| s.to_string_lossy().eq_ignore_ascii_case(&stem))
            && p.extension()
                .is_some_and(|e| e.eq_ignore_ascii_case(ext))
    })
}

fn children(dir: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .map(walkdir::DirEntry::into_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_child_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("arena2")).unwrap();
        std::fs::write(dir.path().join("arena2").join("text.rsc"), b"x").unwrap();

        let arena2 = find_child(dir.path(), "ARENA2").unwrap();
        assert_eq!(arena2, dir.path().join("arena2"));
        assert_eq!(find_child(&arena2, "TEXT.RSC"), Some(arena2.join("text.rsc")));
        assert!(find_child(dir.path(), "FALL.EXE").is_none());
    }

    #[test]
    fn test_find_sibling_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let qbn = dir.path().join("M0B00Y00.QBN");
        std::fs::write(&qbn, b"x").unwrap();
        assert!(find_sibling_with_extension(&qbn, "QRC").is_none());

        std::fs::write(dir.path().join("m0b00y00.Qrc"), b"x").unwrap();
        assert_eq!(
            find_sibling_with_extension(&qbn, "QRC"),
            Some(dir.path().join("m0b00y00.Qrc"))
        );
    }
}
