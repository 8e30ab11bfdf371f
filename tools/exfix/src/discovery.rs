use crate::errors::FixError;
use crate::runtime::FileSystem;
use std::path::{Path, PathBuf};

pub const DEFAULT_PATTERN: &str = "*_test.go";

/// Files directly inside `dir` whose name matches `pattern`, sorted by name.
pub fn discover_candidates(
    fs: &dyn FileSystem,
    dir: &Path,
    pattern: &str,
) -> Result<Vec<PathBuf>, FixError> {
    let mut files = fs
        .list_files(dir)?
        .into_iter()
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| wildcard_match(pattern, name))
        })
        .collect::<Vec<_>>();
    files.sort();
    Ok(files)
}

/// `*` matches any run of characters; every other character is literal.
pub fn wildcard_match(pattern: &str, name: &str) -> bool {
    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or_default();
    let Some(mut rest) = name.strip_prefix(first) else {
        return false;
    };

    let middle = parts.collect::<Vec<_>>();
    let Some((last, middle)) = middle.split_last() else {
        return rest.is_empty();
    };

    for part in middle {
        match rest.find(part) {
            Some(at) => rest = &rest[at + part.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::FakeFileSystem;

    #[test]
    fn default_pattern_selects_go_test_files() {
        assert!(wildcard_match(DEFAULT_PATTERN, "example_test.go"));
        assert!(wildcard_match(DEFAULT_PATTERN, "_test.go"));
        assert!(wildcard_match(DEFAULT_PATTERN, ".hidden_test.go"));
        assert!(!wildcard_match(DEFAULT_PATTERN, "example.go"));
        assert!(!wildcard_match(DEFAULT_PATTERN, "example_test.go.orig"));
    }

    #[test]
    fn literal_and_multi_star_patterns() {
        assert!(wildcard_match("doc.go", "doc.go"));
        assert!(!wildcard_match("doc.go", "doc.go2"));
        assert!(wildcard_match("a*b*c", "abc"));
        assert!(wildcard_match("a*b*c", "a-b-b-c"));
        assert!(!wildcard_match("a*b*c", "acb"));
        assert!(!wildcard_match("ab*ba", "aba"));
        assert!(wildcard_match("*", ""));
    }

    #[test]
    fn candidates_are_sorted_and_non_recursive() {
        let fs = FakeFileSystem::default();
        fs.seed("/pkg/z_test.go", "");
        fs.seed("/pkg/a_test.go", "");
        fs.seed("/pkg/main.go", "");
        fs.seed("/pkg/sub/b_test.go", "");

        let found = discover_candidates(&fs, Path::new("/pkg"), DEFAULT_PATTERN).expect("list");
        assert_eq!(
            found,
            vec![PathBuf::from("/pkg/a_test.go"), PathBuf::from("/pkg/z_test.go")]
        );
    }

    #[test]
    fn listing_failure_is_a_discovery_error() {
        let fs = FakeFileSystem::default();
        fs.set_fail_next(FixError::Discovery("no such directory".to_string()));
        let err = discover_candidates(&fs, Path::new("/gone"), DEFAULT_PATTERN)
            .expect_err("must fail");
        assert!(matches!(err, FixError::Discovery(_)));
    }
}
