use crate::errors::FixError;
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String, FixError>;
    /// Replaces the whole file. Create/write failures are `Write`, a failed
    /// final flush is `Close`.
    fn write_string(&self, path: &Path, contents: &str) -> Result<(), FixError>;
    /// Regular files directly inside `dir`, in no particular order. Directories
    /// and dangling symlinks are skipped.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, FixError>;
}

pub trait Terminal: Send + Sync {
    fn read_input(&self) -> Result<String, FixError>;
    fn write_line(&self, line: &str) -> Result<(), FixError>;
}

pub struct ProductionFileSystem;

impl FileSystem for ProductionFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, FixError> {
        std::fs::read_to_string(path)
            .map_err(|e| FixError::Read(format!("{}: {e}", path.display())))
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<(), FixError> {
        let mut file = std::fs::File::create(path)
            .map_err(|e| FixError::Write(format!("{}: {e}", path.display())))?;
        file.write_all(contents.as_bytes())
            .map_err(|e| FixError::Write(format!("{}: {e}", path.display())))?;
        file.flush()
            .map_err(|e| FixError::Close(format!("{}: {e}", path.display())))
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, FixError> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| FixError::Discovery(format!("{}: {e}", dir.display())))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FixError::Discovery(e.to_string()))?;
            let path = entry.path();
            if path.is_file() {
                files.push(path);
            }
        }
        Ok(files)
    }
}

pub struct ProductionTerminal;

impl Terminal for ProductionTerminal {
    fn read_input(&self) -> Result<String, FixError> {
        let mut bytes = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .map_err(|e| FixError::Input(e.to_string()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn write_line(&self, line: &str) -> Result<(), FixError> {
        let mut out = std::io::stdout();
        writeln!(out, "{line}").map_err(|e| FixError::Io(e.to_string()))
    }
}

pub struct ProductionRuntime {
    pub file_system: Arc<dyn FileSystem>,
    pub terminal: Arc<dyn Terminal>,
}

impl ProductionRuntime {
    pub fn new() -> Self {
        Self {
            file_system: Arc::new(ProductionFileSystem),
            terminal: Arc::new(ProductionTerminal),
        }
    }
}

impl Default for ProductionRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default, Clone)]
pub struct FakeFileSystem {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    writes: Arc<Mutex<Vec<PathBuf>>>,
    fail_next: Arc<Mutex<Option<FixError>>>,
    fail_read_on: Arc<Mutex<Option<PathBuf>>>,
    fail_write_on: Arc<Mutex<Option<PathBuf>>>,
    fail_close_on: Arc<Mutex<Option<PathBuf>>>,
}

impl FakeFileSystem {
    pub fn with_file(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let fs = Self::default();
        fs.seed(path, contents);
        fs
    }

    /// Inserts a file without recording a write.
    pub fn seed(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files
            .lock()
            .expect("files lock")
            .insert(path.into(), contents.into());
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().expect("files lock").get(path).cloned()
    }

    pub fn written_paths(&self) -> Vec<PathBuf> {
        self.writes.lock().expect("writes lock").clone()
    }

    pub fn set_fail_next(&self, error: FixError) {
        *self.fail_next.lock().expect("fail lock") = Some(error);
    }

    pub fn fail_reads_from(&self, path: impl Into<PathBuf>) {
        *self.fail_read_on.lock().expect("fail lock") = Some(path.into());
    }

    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        *self.fail_write_on.lock().expect("fail lock") = Some(path.into());
    }

    /// The write lands but closing the file reports an error.
    pub fn fail_close_on(&self, path: impl Into<PathBuf>) {
        *self.fail_close_on.lock().expect("fail lock") = Some(path.into());
    }

    fn targets(slot: &Mutex<Option<PathBuf>>, path: &Path) -> bool {
        slot.lock().expect("fail lock").as_deref() == Some(path)
    }

    fn maybe_fail(&self) -> Result<(), FixError> {
        if let Some(err) = self.fail_next.lock().expect("fail lock").take() {
            return Err(err);
        }
        Ok(())
    }
}

impl FileSystem for FakeFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, FixError> {
        self.maybe_fail()?;
        if Self::targets(&self.fail_read_on, path) {
            return Err(FixError::Read(format!("{}: input/output error", path.display())));
        }
        self.contents(path)
            .ok_or_else(|| FixError::Read(format!("missing file {}", path.display())))
    }

    fn write_string(&self, path: &Path, contents: &str) -> Result<(), FixError> {
        self.maybe_fail()?;
        if Self::targets(&self.fail_write_on, path) {
            return Err(FixError::Write(format!("{}: permission denied", path.display())));
        }
        self.writes
            .lock()
            .expect("writes lock")
            .push(path.to_path_buf());
        self.seed(path, contents);
        if Self::targets(&self.fail_close_on, path) {
            return Err(FixError::Close(format!("{}: no space left on device", path.display())));
        }
        Ok(())
    }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>, FixError> {
        self.maybe_fail()?;
        Ok(self
            .files
            .lock()
            .expect("files lock")
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub struct FakeTerminal {
    input: Arc<Mutex<Option<String>>>,
    writes: Arc<Mutex<Vec<String>>>,
}

impl FakeTerminal {
    pub fn with_input(input: impl Into<String>) -> Self {
        Self {
            input: Arc::new(Mutex::new(Some(input.into()))),
            ..Self::default()
        }
    }

    pub fn written_lines(&self) -> Vec<String> {
        self.writes.lock().expect("writes lock").clone()
    }
}

impl Terminal for FakeTerminal {
    fn read_input(&self) -> Result<String, FixError> {
        self.input
            .lock()
            .expect("input lock")
            .take()
            .ok_or_else(|| FixError::Input("input already consumed".to_string()))
    }

    fn write_line(&self, line: &str) -> Result<(), FixError> {
        self.writes
            .lock()
            .expect("writes lock")
            .push(line.to_string());
        Ok(())
    }
}
