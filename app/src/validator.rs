// ==============================================================================
// validator.rs - Input File Validation
// ==============================================================================
// Description: Validates local dataset and model files (size, type, format)
// Author: Matt Barham
// Created: 2025-10-31
// Modified: 2026-01-17
// Version: 2.0.0
// Security: Allowlist-only file types, magic number verification
// ==============================================================================

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const MAX_DATASET_SIZE: u64 = 200 * 1024 * 1024; // 200 MB
const MAX_MODEL_SIZE: u64 = 10 * 1024 * 1024; // 10 MB

/// ZIP local file header (xlsx, xlsm and ods are zip containers)
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];

/// OLE2 compound document header (legacy .xls)
const OLE2_MAGIC: [u8; 4] = [0xd0, 0xcf, 0x11, 0xe0];

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a regular file: {0}")]
    NotAFile(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("File is empty: {0}")]
    Empty(PathBuf),

    #[error("Invalid file type: {0}")]
    InvalidType(String),

    #[error("Magic number mismatch for .{0} file")]
    MagicMismatch(String),
}

#[derive(Debug, Clone)]
pub struct ValidatedFile {
    pub path: PathBuf,
    pub extension: String,
    pub size: u64,
    pub hash_sha256: String,
}

pub struct FileValidator {
    max_file_size: u64,
    allowed_types: HashMap<String, Vec<u8>>,
}

impl FileValidator {
    /// Validator for tabular association datasets
    pub fn for_dataset() -> Self {
        let mut allowed_types = HashMap::new();

        // Delimited text (no specific magic number)
        allowed_types.insert("csv".to_string(), vec![]);
        allowed_types.insert("tsv".to_string(), vec![]);
        allowed_types.insert("txt".to_string(), vec![]);

        // Spreadsheets
        allowed_types.insert("xlsx".to_string(), ZIP_MAGIC.to_vec());
        allowed_types.insert("xlsm".to_string(), ZIP_MAGIC.to_vec());
        allowed_types.insert("ods".to_string(), ZIP_MAGIC.to_vec());
        allowed_types.insert("xls".to_string(), OLE2_MAGIC.to_vec());

        Self {
            max_file_size: MAX_DATASET_SIZE,
            allowed_types,
        }
    }

    /// Validator for serialized model artifacts
    pub fn for_model() -> Self {
        let mut allowed_types = HashMap::new();
        allowed_types.insert("json".to_string(), vec![]);

        Self {
            max_file_size: MAX_MODEL_SIZE,
            allowed_types,
        }
    }

    pub fn validate(&self, path: &Path) -> Result<ValidatedFile, ValidationError> {
        info!("Validating file: {}", path.display());

        // 1. Existence
        if !path.exists() {
            return Err(ValidationError::NotFound(path.to_path_buf()));
        }
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(ValidationError::NotAFile(path.to_path_buf()));
        }

        // 2. Size check
        let size = metadata.len();
        if size > self.max_file_size {
            return Err(ValidationError::TooLarge {
                size,
                max: self.max_file_size,
            });
        }
        if size == 0 {
            return Err(ValidationError::Empty(path.to_path_buf()));
        }
        debug!("Size check passed: {} bytes", size);

        // 3. Extension check (allowlist)
        let ext = self.get_extension(path)?;
        let expected_magic = self
            .allowed_types
            .get(&ext)
            .ok_or_else(|| ValidationError::InvalidType(ext.clone()))?;
        debug!("Extension check passed: {}", ext);

        // 4. Magic number verification
        if !expected_magic.is_empty() {
            let actual_magic = self.read_magic_number(path)?;
            if !self.verify_magic_number(expected_magic, &actual_magic) {
                return Err(ValidationError::MagicMismatch(ext));
            }
            debug!("Magic number check passed");
        }

        // 5. Compute SHA-256 hash
        let hash = self.compute_sha256(path)?;
        debug!("SHA-256: {}", hash);

        Ok(ValidatedFile {
            path: path.to_path_buf(),
            extension: ext,
            size,
            hash_sha256: hash,
        })
    }

    fn get_extension(&self, path: &Path) -> Result<String, ValidationError> {
        path.extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .ok_or_else(|| ValidationError::InvalidType("(none)".to_string()))
    }

    fn read_magic_number(&self, path: &Path) -> Result<Vec<u8>, ValidationError> {
        let mut file = File::open(path)?;
        let mut buffer = Vec::with_capacity(4);
        file.by_ref().take(4).read_to_end(&mut buffer)?;
        Ok(buffer)
    }

    fn verify_magic_number(&self, expected: &[u8], actual: &[u8]) -> bool {
        expected.len() <= actual.len()
            && expected.iter().zip(actual.iter()).all(|(e, a)| e == a)
    }

    fn compute_sha256(&self, path: &Path) -> Result<String, ValidationError> {
        let mut file = File::open(path)?;
        let mut hasher = Sha256::new();
        let mut buffer = vec![0u8; 8192];

        loop {
            let n = file.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }
}
