//! Version resolution from the build-configuration descriptor.
//!
//! The recipe does not carry its own version; it is read out of the
//! project's `CMakeLists.txt`, from whichever line first carries a
//! `VERSION <major>.<minor>.<patch>` token. Whether a missing match is an
//! error is the caller's decision, not ours.

use regex::Regex;
use semver::Version;

/// Scan descriptor text for the first `VERSION x.y.z` occurrence.
///
/// Returns `None` when no line carries a matching triple; the caller
/// supplies the fallback (typically the manifest's placeholder).
pub fn resolve_version(text: &str) -> Option<Version> {
    let re = Regex::new(r"VERSION\s+(\d+)\.(\d+)\.(\d+)").unwrap();

    for line in text.lines() {
        if !line.contains("VERSION") {
            continue;
        }
        if let Some(caps) = re.captures(line) {
            // Groups are \d+ by construction; u64 overflow is the only
            // way parse can fail here, and such a version is nonsense.
            let major: u64 = caps[1].parse().ok()?;
            let minor: u64 = caps[2].parse().ok()?;
            let patch: u64 = caps[3].parse().ok()?;
            return Some(Version::new(major, minor, patch));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_version_line() {
        assert_eq!(
            resolve_version("VERSION 1.2.3"),
            Some(Version::new(1, 2, 3))
        );
    }

    #[test]
    fn test_project_statement() {
        let text = "cmake_minimum_required(VERSION 3.15)\n\
                    project(Foo VERSION 3.4.5 LANGUAGES CXX)\n";
        // The cmake_minimum_required line carries VERSION too, but its
        // argument is only a two-part number, so project() wins.
        assert_eq!(resolve_version(text), Some(Version::new(3, 4, 5)));
    }

    #[test]
    fn test_first_triple_wins() {
        let text = "project(Foo VERSION 1.0.0)\nset(OTHER_VERSION 9.9.9)\n";
        assert_eq!(resolve_version(text), Some(Version::new(1, 0, 0)));
    }

    #[test]
    fn test_no_version_token() {
        let text = "add_library(foo INTERFACE)\ntarget_sources(foo INTERFACE foo.hpp)\n";
        assert_eq!(resolve_version(text), None);
    }

    #[test]
    fn test_two_part_version_does_not_match() {
        assert_eq!(resolve_version("cmake_minimum_required(VERSION 3.15)"), None);
    }
}
