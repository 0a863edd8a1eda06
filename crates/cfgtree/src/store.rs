//! Backing stores a configuration loads from and saves to.

use std::cell::RefCell;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Somewhere configuration text is read from and written to.
pub trait ConfigStore: fmt::Debug {
    /// A human-readable name for diagnostics, e.g. a file path.
    fn name(&self) -> String;

    fn read(&self) -> io::Result<String>;

    fn write(&mut self, text: &str) -> io::Result<()>;
}

/// A UTF-8 file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileStore {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> io::Result<String> {
        fs::read_to_string(&self.path)
    }

    /// Write the text, creating missing parent directories first.
    fn write(&mut self, text: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, text)
    }
}

/// An in-memory buffer.
///
/// Clones share the buffer, so a caller can keep one clone to inspect what a
/// configuration saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Rc<RefCell<String>>,
}

impl MemoryStore {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            contents: Rc::new(RefCell::new(text.into())),
        }
    }

    pub fn contents(&self) -> String {
        self.contents.borrow().clone()
    }
}

impl ConfigStore for MemoryStore {
    fn name(&self) -> String {
        "<memory>".to_string()
    }

    fn read(&self) -> io::Result<String> {
        Ok(self.contents())
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        *self.contents.borrow_mut() = text.to_string();
        Ok(())
    }
}
