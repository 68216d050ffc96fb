use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

use parcela_core::borrower::{BorrowerRecord, InMemoryDirectory};

/// Read a JSON or YAML file (by extension) and deserialise into a typed struct.
pub fn read_input<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    parse_input(&canonical, &contents)
}

fn parse_input<T: DeserializeOwned>(
    path: &Path,
    contents: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let value = if is_yaml {
        serde_yaml::from_str(contents)
            .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?
    } else {
        serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse '{}': {}", path.display(), e))?
    };
    Ok(value)
}

/// Load a borrower CSV (`cpf,name,employer,pre_approved_limit,max_installment`)
/// into an in-memory directory.
pub fn read_borrowers(path: &str) -> Result<InMemoryDirectory, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let mut rdr = csv::Reader::from_path(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    parse_borrowers(&mut rdr)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e).into())
}

fn parse_borrowers<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> Result<InMemoryDirectory, csv::Error> {
    let mut directory = InMemoryDirectory::new();
    for row in rdr.deserialize() {
        let record: BorrowerRecord = row?;
        if let Some(previous) = directory.insert(record) {
            log::warn!("duplicate borrower {}; keeping the last row", previous.cpf);
        }
    }
    log::info!("loaded {} borrowers", directory.len());
    Ok(directory)
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}
