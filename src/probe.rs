// Copyright 2024 The ironic-drivers Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Probing for external libraries.
//!
//! Some implementations depend on a vendor SDK installed separately. Drivers
//! using them check the SDK with a [LibraryProbe](trait.LibraryProbe.html)
//! before anything else is instantiated.

use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

use log::{trace, warn};

/// Check whether an external library is available.
///
/// Implementations must not have side effects beyond the answer, so that a
/// failed driver construction can be safely retried.
pub trait LibraryProbe {
    /// Whether the library can be used.
    fn is_available(&self, library: &str) -> bool;
}

impl<F> LibraryProbe for F
where
    F: Fn(&str) -> bool,
{
    fn is_available(&self, library: &str) -> bool {
        self(library)
    }
}

/// Probe answering from a fixed set of library names.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    available: HashSet<String>,
}

impl StaticProbe {
    /// Create a probe that knows about the provided libraries.
    pub fn new<I, S>(libraries: I) -> StaticProbe
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticProbe {
            available: libraries.into_iter().map(Into::into).collect(),
        }
    }
}

impl LibraryProbe for StaticProbe {
    fn is_available(&self, library: &str) -> bool {
        self.available.contains(library)
    }
}

/// Probe looking for libraries in a list of directories.
///
/// A library `Foo` is found if any of the directories contains `Foo`,
/// `libFoo.so` or `Foo.so`.
#[derive(Debug, Clone)]
pub struct SearchPathProbe {
    paths: Vec<PathBuf>,
}

impl SearchPathProbe {
    /// Create a probe searching the provided directories.
    pub fn new<I, P>(paths: I) -> SearchPathProbe
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        SearchPathProbe {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Directories from `LD_LIBRARY_PATH` followed by the system ones.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut result: Vec<PathBuf> = env::var_os("LD_LIBRARY_PATH")
            .map(|value| env::split_paths(&value).collect())
            .unwrap_or_default();
        result.push(PathBuf::from("/usr/local/lib"));
        result.push(PathBuf::from("/usr/lib"));
        result
    }

    /// Searched directories.
    #[inline]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Library names must be plain file names, never paths.
    fn is_valid_name(library: &str) -> bool {
        !library.is_empty()
            && library != "."
            && library != ".."
            && !library.chars().any(std::path::is_separator)
    }

    fn find_in(dir: &Path, library: &str) -> Option<PathBuf> {
        [
            library.to_string(),
            format!("lib{}.so", library),
            format!("{}.so", library),
        ]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.exists())
    }
}

impl Default for SearchPathProbe {
    fn default() -> SearchPathProbe {
        SearchPathProbe::new(SearchPathProbe::default_paths())
    }
}

impl LibraryProbe for SearchPathProbe {
    fn is_available(&self, library: &str) -> bool {
        if !SearchPathProbe::is_valid_name(library) {
            warn!("Refusing to probe for invalid library name {:?}", library);
            return false;
        }

        match self
            .paths
            .iter()
            .find_map(|dir| SearchPathProbe::find_in(dir, library))
        {
            Some(found) => {
                trace!("Library {} found at {:?}", library, found);
                true
            }
            None => {
                trace!("Library {} not found in {:?}", library, self.paths);
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(missing_docs)]
pub mod test {
    use std::fs;

    use super::{LibraryProbe, SearchPathProbe, StaticProbe};

    #[test]
    fn test_closure_probe() {
        let probe = |name: &str| name == "UcsSdk";
        assert!(probe.is_available("UcsSdk"));
        assert!(!probe.is_available("ImcSdk"));
    }

    #[test]
    fn test_static_probe() {
        let probe = StaticProbe::new(vec!["ImcSdk"]);
        assert!(probe.is_available("ImcSdk"));
        assert!(!probe.is_available("UcsSdk"));
        assert!(!StaticProbe::default().is_available("ImcSdk"));
    }

    #[test]
    fn test_search_path_probe() {
        let dir = std::env::temp_dir().join(format!("ironic-drivers-probe-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("libImcSdk.so"), b"").unwrap();
        fs::create_dir_all(dir.join("UcsSdk")).unwrap();

        let probe = SearchPathProbe::new(vec![dir.join("missing"), dir.clone()]);
        assert_eq!(probe.paths().len(), 2);
        assert!(probe.is_available("ImcSdk"));
        assert!(probe.is_available("UcsSdk"));
        assert!(!probe.is_available("pyghmi"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_search_path_probe_rejects_paths() {
        let dir = std::env::temp_dir().join(format!(
            "ironic-drivers-probe-names-{}",
            std::process::id()
        ));
        fs::create_dir_all(dir.join("sub")).unwrap();
        fs::write(dir.join("sub").join("libImcSdk.so"), b"").unwrap();

        let probe = SearchPathProbe::new(vec![dir.clone()]);
        assert!(!probe.is_available(""));
        assert!(!probe.is_available("."));
        assert!(!probe.is_available(".."));
        assert!(!probe.is_available("/etc"));
        assert!(!probe.is_available("sub/libImcSdk.so"));
        assert!(probe.is_available("sub"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_default_paths_include_system() {
        let paths = SearchPathProbe::default_paths();
        assert!(paths.iter().any(|p| p.ends_with("usr/lib")));
    }
}
