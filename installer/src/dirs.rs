//! Directory resolution for platform-specific paths.
//!
//! Prebuilts are cached per user under the application's data directory:
//! `~/.local/share/perfetto/prebuilts` on Linux and the equivalent locations
//! elsewhere. The [`BaseDirs`] trait keeps that lookup injectable so tests do
//! not depend on the real home directory.

use camino::Utf8PathBuf;
use directories_next::ProjectDirs;
use std::path::PathBuf;

use crate::error::{FetchError, Result};

/// Application name used for the per-user directories.
const APPLICATION: &str = "perfetto";

/// Sub-directory of the data directory holding cached binaries.
const PREBUILTS_SUBDIR: &str = "prebuilts";

/// Source of per-user base directories.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The application data directory, if one can be determined.
    fn data_dir(&self) -> Option<PathBuf>;

    /// The application configuration directory, if one can be determined.
    fn config_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by the operating system's conventions.
///
/// # Examples
///
/// ```
/// use prebuilts_installer::dirs::{BaseDirs, SystemBaseDirs};
///
/// let dirs = SystemBaseDirs::new();
/// if let Some(data) = dirs.data_dir() {
///     assert!(data.is_absolute());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SystemBaseDirs {
    project: Option<ProjectDirs>,
}

impl SystemBaseDirs {
    /// Resolve the directories for the current user.
    #[must_use]
    pub fn new() -> Self {
        Self {
            project: ProjectDirs::from("", "", APPLICATION),
        }
    }
}

impl Default for SystemBaseDirs {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseDirs for SystemBaseDirs {
    fn data_dir(&self) -> Option<PathBuf> {
        self.project.as_ref().map(|p| p.data_dir().to_path_buf())
    }

    fn config_dir(&self) -> Option<PathBuf> {
        self.project.as_ref().map(|p| p.config_dir().to_path_buf())
    }
}

/// Build the default prebuilt cache directory: `<data_dir>/prebuilts`.
///
/// # Errors
///
/// Returns [`FetchError::CacheDirUnavailable`] when the data directory cannot
/// be determined or is not valid UTF-8.
pub fn prebuilt_cache_dir(dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
    let base_dir = dirs
        .data_dir()
        .ok_or_else(|| FetchError::CacheDirUnavailable {
            reason: "could not determine the user data directory".to_owned(),
        })?;
    let utf8_base =
        Utf8PathBuf::from_path_buf(base_dir).map_err(|path| FetchError::CacheDirUnavailable {
            reason: format!("data directory is not valid UTF-8: {}", path.display()),
        })?;
    Ok(utf8_base.join(PREBUILTS_SUBDIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_dir_is_under_data_dir() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_data_dir()
            .returning(|| Some(PathBuf::from("/home/test/.local/share/perfetto")));

        let result = prebuilt_cache_dir(&dirs).expect("expected path construction to succeed");
        assert_eq!(
            result,
            Utf8PathBuf::from("/home/test/.local/share/perfetto/prebuilts")
        );
    }

    #[test]
    fn missing_data_dir_is_reported() {
        let mut dirs = MockBaseDirs::new();
        dirs.expect_data_dir().return_once(|| None);

        let err = prebuilt_cache_dir(&dirs).expect_err("expected error");
        assert!(
            matches!(err, FetchError::CacheDirUnavailable { ref reason } if reason.contains("could not determine")),
            "unexpected error: {err}"
        );
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_data_dir_is_rejected() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let mut dirs = MockBaseDirs::new();
        dirs.expect_data_dir().return_once(|| {
            Some(PathBuf::from(OsString::from_vec(vec![
                b'/', b't', b'm', b'p', b'/', 0xff,
            ])))
        });

        let err = prebuilt_cache_dir(&dirs).expect_err("expected UTF-8 conversion error");
        assert!(
            matches!(err, FetchError::CacheDirUnavailable { ref reason } if reason.contains("not valid UTF-8")),
            "unexpected error: {err}"
        );
    }
}
