// src/system/fs.rs

//! Filesystem capability used by the dispatcher to stage scripts.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

/// How a path must be spelled for the shell that receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// The host's own convention.
    Host,
    /// A Windows path for `cmd.exe` launched from inside WSL (`/mnt/c/x` becomes `C:\x`).
    WindowsFromSubsystem,
}

/// The file operations staging needs.
pub trait FileSystem {
    /// Creates `path` and any missing parents. Succeeds if it already exists.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Writes `lines` to `path`, each terminated by `\n`, replacing any previous content.
    fn write_lines(&self, path: &Path, lines: &[String]) -> io::Result<()>;

    /// Removes the file at `path`.
    fn delete(&self, path: &Path) -> io::Result<()>;

    /// The root of a jailed view onto `path`. Staged files are placed relative to it.
    fn jailed_root(&self, path: &Path) -> PathBuf;

    /// The generic temp root of the host.
    fn temp_root(&self) -> PathBuf;

    /// The path string handed to a shell.
    fn native_path(&self, path: &Path, style: PathStyle) -> String;
}

/// The real filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    temp_root: PathBuf,
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalFileSystem {
    /// Uses the system temp directory as the temp root.
    pub fn new() -> Self {
        Self::with_temp_root(std::env::temp_dir())
    }

    /// Uses `temp_root` instead of the system temp directory.
    pub fn with_temp_root(temp_root: impl Into<PathBuf>) -> Self {
        Self {
            temp_root: temp_root.into(),
        }
    }
}

impl FileSystem for LocalFileSystem {
    fn create_dir(&self, path: &Path) -> io::Result<()> {
        match fs::create_dir_all(path) {
            Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            other => other,
        }
    }

    fn write_lines(&self, path: &Path, lines: &[String]) -> io::Result<()> {
        let mut file = fs::File::create(path)?;
        for line in lines {
            file.write_all(line.as_bytes())?;
            file.write_all(b"\n")?;
        }
        file.flush()
    }

    fn delete(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn jailed_root(&self, path: &Path) -> PathBuf {
        dunce::simplified(path).to_path_buf()
    }

    fn temp_root(&self) -> PathBuf {
        self.temp_root.clone()
    }

    fn native_path(&self, path: &Path, style: PathStyle) -> String {
        match style {
            PathStyle::Host => dunce::simplified(path).display().to_string(),
            PathStyle::WindowsFromSubsystem => {
                mounted_drive_path(path).unwrap_or_else(|| path.display().to_string())
            }
        }
    }
}

/// Translates `/mnt/<drive>/rest` into `<DRIVE>:\rest`. Returns `None` for any other path.
fn mounted_drive_path(path: &Path) -> Option<String> {
    let mut components = path.components();
    if components.next() != Some(Component::RootDir) {
        return None;
    }
    if components.next() != Some(Component::Normal("mnt".as_ref())) {
        return None;
    }
    let drive = match components.next() {
        Some(Component::Normal(name)) => name.to_str()?,
        _ => return None,
    };
    let mut letters = drive.chars();
    let letter = letters.next().filter(char::is_ascii_alphabetic)?;
    if letters.next().is_some() {
        return None;
    }

    let rest: Vec<String> = components
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(format!(
        "{}:\\{}",
        letter.to_ascii_uppercase(),
        rest.join("\\")
    ))
}
