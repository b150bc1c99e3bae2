//! Image resolution: which on-disk file backs a loaded image.
//!
//! The hashed byte range of an image is the full file the loader mapped
//! for it. The same unmodified image on the same build therefore always
//! yields the same digest.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tamperguard_core::{BinaryImageRef, IntegrityError, Result};
use tracing::debug;

/// Resolves an image reference to exactly one backing file.
pub trait ImageLocator: Send + Sync {
    /// Locate the file backing `image`.
    ///
    /// Returns `ImageNotFound` when zero or several images match.
    fn locate(&self, image: &BinaryImageRef) -> Result<PathBuf>;
}

/// Locates images loaded into the current process.
///
/// `Main` is the running executable. `Named` modules are looked up among
/// the file-backed mappings of this process, after any explicit overrides.
#[derive(Debug, Clone, Default)]
pub struct ProcessImageLocator {
    main: Option<PathBuf>,
    modules: BTreeMap<String, PathBuf>,
}

impl ProcessImageLocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash `path` instead of the running executable for `Main`
    #[must_use]
    pub fn with_main_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.main = Some(path.into());
        self
    }

    /// Pin a module name to an explicit file
    #[must_use]
    pub fn with_module_path(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.modules.insert(name.into(), path.into());
        self
    }

    fn locate_main(&self) -> Result<PathBuf> {
        if let Some(path) = &self.main {
            return Ok(path.clone());
        }
        std::env::current_exe().map_err(|e| IntegrityError::ImageNotFound {
            image: format!("{}: {e}", BinaryImageRef::Main),
        })
    }

    fn locate_named(&self, name: &str) -> Result<PathBuf> {
        if let Some(path) = self.modules.get(name) {
            return Ok(path.clone());
        }

        let mapped = mapped_files()?;
        debug!(module = name, candidates = mapped.len(), "searching mapped images");
        select_module(&mapped, name)
    }
}

impl ImageLocator for ProcessImageLocator {
    fn locate(&self, image: &BinaryImageRef) -> Result<PathBuf> {
        match image {
            BinaryImageRef::Main => self.locate_main(),
            BinaryImageRef::Named(name) => self.locate_named(name),
        }
    }
}

/// Distinct files mapped into this process.
#[cfg(target_os = "linux")]
fn mapped_files() -> Result<BTreeSet<PathBuf>> {
    use procfs::process::{MMapPath, Process};

    let maps = Process::myself()
        .and_then(|p| p.maps())
        .map_err(|e| IntegrityError::ImageNotFound {
            image: format!("process maps unavailable: {e}"),
        })?;

    Ok(maps
        .into_iter()
        .filter_map(|m| match m.pathname {
            MMapPath::Path(path) => Some(path),
            _ => None,
        })
        .collect())
}

#[cfg(not(target_os = "linux"))]
fn mapped_files() -> Result<BTreeSet<PathBuf>> {
    Err(IntegrityError::ImageNotFound {
        image: "loaded module lookup is not supported on this platform".into(),
    })
}

/// Whether `path` is an image of module `name`.
///
/// Accepts `name`, `name.*`, `libname.so*`, and `name.framework/name`.
fn is_module(path: &Path, name: &str) -> bool {
    let Some(file) = path.file_name().and_then(|f| f.to_str()) else {
        return false;
    };

    if file == name || file.starts_with(&format!("{name}.")) {
        return true;
    }
    if file.starts_with(&format!("lib{name}.so")) {
        return true;
    }
    path.parent()
        .and_then(|p| p.file_name())
        .and_then(|d| d.to_str())
        .is_some_and(|dir| dir == format!("{name}.framework"))
        && file == name
}

/// Pick the single mapped file for `name`.
fn select_module(mapped: &BTreeSet<PathBuf>, name: &str) -> Result<PathBuf> {
    let matches: Vec<&PathBuf> = mapped.iter().filter(|p| is_module(p, name)).collect();

    match matches.as_slice() {
        [only] => Ok((*only).clone()),
        [] => Err(IntegrityError::ImageNotFound {
            image: BinaryImageRef::Named(name.to_string()).to_string(),
        }),
        many => Err(IntegrityError::ImageNotFound {
            image: format!(
                "{} is ambiguous ({} candidates)",
                BinaryImageRef::Named(name.to_string()),
                many.len()
            ),
        }),
    }
}
