use serde::Deserialize;
use std::env::consts::{EXE_SUFFIX, OS};
use std::env::var;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

pub const VENDOR_NAME: &str = "artefaden";
pub const APP_NAME: &str = "lsup";

/// Name of the managed server binary, platform suffix included.
pub fn server_binary_name() -> String {
    format!("lsup-server{}", EXE_SUFFIX)
}

#[derive(Deserialize, Clone)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl DataStorage {
    pub fn new() -> Self {
        let base_path = match OS {
            "windows" => var("LOCALAPPDATA").unwrap_or_else(|_| ".".into()),
            "macos" => var("HOME").unwrap_or_else(|_| ".".into()) + "/Library/Application Support",
            _ => var("HOME").unwrap_or_else(|_| ".".into()) + "/.local/share",
        };
        let base_path = Path::new(&base_path).join(VENDOR_NAME).join(APP_NAME);

        Self { base_path }
    }

    pub fn get_path(&self, file_name: &str) -> Result<PathBuf, Box<dyn Error>> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.join(file_name))
    }

    pub fn base_path(&self) -> Result<PathBuf, Box<dyn Error>> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.clone())
    }

    /// Location the update pipeline installs the server binary into.
    pub fn server_binary_path(&self) -> Result<PathBuf, Box<dyn Error>> {
        self.get_path(&server_binary_name())
    }
}
