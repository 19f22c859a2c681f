use std::fs;
use std::io;
use std::path::{self, Path, PathBuf};

use crate::error::FetchError;
use crate::logging::StepLogger;

/// Local file the download is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    path: PathBuf,
}

impl Destination {
    /// Resolves `raw` against the working directory.
    ///
    /// A resolution failure is only logged; the raw input is kept and any real
    /// problem shows up when the directory or file is created. A path without a
    /// final file name is rejected before any I/O happens.
    pub fn resolve(raw: &str, log: &StepLogger) -> Result<Self, FetchError> {
        let (path, resolved) = match path::absolute(raw) {
            Ok(path) => (path, true),
            Err(e) => {
                log.step(format_args!("unable to get filepath: {}", e));
                (PathBuf::from(raw), false)
            }
        };

        log.step("generated filepath");

        let no_file_name = resolved && path.file_name().is_none();
        if ends_with_separator(raw) || ends_with_separator(&path.to_string_lossy()) || no_file_name
        {
            return Err(FetchError::MissingFilename { path });
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory that has to exist before the file can be created.
    pub fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    /// Makes sure the parent directory exists, creating it and any missing
    /// ancestors. Nothing is removed again if a later step fails.
    pub fn ensure_parent_dir(&self, log: &StepLogger) -> Result<(), FetchError> {
        let dir = self.parent_dir();
        log.step("ensuring file destination exists");

        match fs::metadata(dir) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log.step("file destination didn't exist yet, creating it");
                create_dir_all(dir).map_err(|source| {
                    log.step(format_args!("unable to create {}: {}", dir.display(), source));
                    FetchError::CreateDir {
                        path: dir.to_path_buf(),
                        source,
                    }
                })
            }
            Err(source) => {
                log.step(format_args!("unable to inspect {}: {}", dir.display(), source));
                Err(FetchError::InspectDir {
                    path: dir.to_path_buf(),
                    source,
                })
            }
        }
    }
}

fn ends_with_separator(s: &str) -> bool {
    s.chars().last().is_some_and(path::is_separator)
}

fn create_dir_all(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder.create(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn quiet() -> StepLogger {
        StepLogger::new(false)
    }

    #[test]
    fn relative_path_becomes_absolute() {
        let dest = Destination::resolve("out/data.bin", &quiet()).unwrap();
        assert!(dest.path().is_absolute());
        assert!(dest.path().ends_with("out/data.bin"));
        assert!(dest.parent_dir().ends_with("out"));
    }

    #[test]
    fn trailing_separator_means_no_filename() {
        for raw in ["./", "/tmp/out/", "some/dir/", "/"] {
            let err = Destination::resolve(raw, &quiet()).unwrap_err();
            assert!(
                matches!(err, FetchError::MissingFilename { .. }),
                "raw {:?} gave {:?}",
                raw,
                err
            );
            assert_eq!(err.kind(), ErrorKind::Config);
        }
    }

    #[test]
    fn parent_reference_has_no_filename() {
        let err = Destination::resolve("/tmp/..", &quiet()).unwrap_err();
        assert!(matches!(err, FetchError::MissingFilename { .. }));
    }

    #[test]
    fn unresolvable_input_is_kept_as_is() {
        let log = StepLogger::new(true);
        let dest = Destination::resolve("", &log).unwrap();
        assert_eq!(dest.path(), Path::new(""));
        assert_eq!(dest.parent_dir(), Path::new("."));
        // failure line plus "generated filepath"
        assert_eq!(log.emitted(), 2);
    }

    #[test]
    fn creates_missing_ancestors() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("a/b/c/file.bin");
        let dest = Destination::resolve(target.to_str().unwrap(), &quiet()).unwrap();

        dest.ensure_parent_dir(&quiet()).unwrap();

        assert!(tmp.path().join("a/b/c").is_dir());
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn created_directories_are_not_group_writable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("fresh/file.bin");
        let dest = Destination::resolve(target.to_str().unwrap(), &quiet()).unwrap();
        dest.ensure_parent_dir(&quiet()).unwrap();

        let mode = fs::metadata(tmp.path().join("fresh")).unwrap().permissions().mode();
        assert_eq!(mode & 0o700, 0o700);
        assert_eq!(mode & 0o022, 0);
    }

    #[test]
    fn existing_directory_is_left_alone() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("file.bin");
        let dest = Destination::resolve(target.to_str().unwrap(), &quiet()).unwrap();

        let log = StepLogger::new(true);
        dest.ensure_parent_dir(&log).unwrap();
        assert_eq!(log.emitted(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn file_in_the_way_fails_inspection() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("blocker"), b"x").unwrap();
        let target = tmp.path().join("blocker/sub/file.bin");
        let dest = Destination::resolve(target.to_str().unwrap(), &quiet()).unwrap();

        let err = dest.ensure_parent_dir(&quiet()).unwrap_err();
        assert!(matches!(err, FetchError::InspectDir { .. }), "{:?}", err);
        assert_eq!(err.kind(), ErrorKind::Filesystem);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_fails_creation() {
        let tmp = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(tmp.path().join("nowhere"), tmp.path().join("link")).unwrap();
        let target = tmp.path().join("link/file.bin");
        let dest = Destination::resolve(target.to_str().unwrap(), &quiet()).unwrap();

        let log = StepLogger::new(true);
        let err = dest.ensure_parent_dir(&log).unwrap_err();

        assert!(matches!(err, FetchError::CreateDir { .. }), "{:?}", err);
        assert_eq!(err.kind(), ErrorKind::Filesystem);
        assert!(err.to_string().starts_with("unable to create directory: "));
        // ensuring, creating, failure cause
        assert_eq!(log.emitted(), 3);
        assert!(!tmp.path().join("nowhere").exists());
    }
}
