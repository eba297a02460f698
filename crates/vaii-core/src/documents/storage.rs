//! Storage of accepted documents under a standardised file name.

use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::document::{DocumentType, SubmittedDocument};

/// Trait for document storage backends.
pub trait DocumentStore: Send + Sync {
    /// Store `document` under a name derived from the applicant's tax ID and
    /// name, returning the stored file name.
    fn store(
        &self,
        document: &SubmittedDocument,
        tax_id: &str,
        name: &str,
        doc_type: DocumentType,
    ) -> Result<String, StorageError>;
}

/// Build `<taxIdDigits>_<name>_<type><.ext>`, where the name keeps only
/// lowercase ASCII letters and digits, truncated to `name_max_len`.
pub fn standard_file_name(
    document: &SubmittedDocument,
    tax_id: &str,
    name: &str,
    doc_type: DocumentType,
    name_max_len: usize,
) -> Result<String, StorageError> {
    let tax_digits: String = tax_id.chars().filter(|c| c.is_ascii_digit()).collect();
    let clean_name: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(name_max_len)
        .collect();

    if tax_digits.is_empty() {
        return Err(StorageError::InvalidName {
            tax_id: tax_id.to_string(),
            name: name.to_string(),
        });
    }

    let extension = document
        .extension()
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    Ok(format!(
        "{}_{}_{}{}",
        tax_digits,
        clean_name,
        doc_type.key().replace('-', "_"),
        extension
    ))
}

/// Filesystem store writing into a single directory.
///
/// Writing the same bytes under the same name twice succeeds, so re-running a
/// submission is idempotent.
pub struct FsDocumentStore {
    dir: PathBuf,
    name_max_len: usize,
}

impl FsDocumentStore {
    pub fn new(dir: impl Into<PathBuf>, name_max_len: usize) -> Self {
        Self {
            dir: dir.into(),
            name_max_len,
        }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

impl DocumentStore for FsDocumentStore {
    fn store(
        &self,
        document: &SubmittedDocument,
        tax_id: &str,
        name: &str,
        doc_type: DocumentType,
    ) -> Result<String, StorageError> {
        let file_name = standard_file_name(document, tax_id, name, doc_type, self.name_max_len)?;
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&file_name);

        if path.exists() {
            return if fs::read(&path)? == document.data {
                debug!("{} already stored with identical contents", file_name);
                Ok(file_name)
            } else {
                Err(StorageError::Collision(file_name))
            };
        }

        // Only complete files ever appear under the standard name.
        let partial = self.dir.join(format!(".{file_name}.partial"));
        if let Err(e) = fs::write(&partial, &document.data) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }
        fs::rename(&partial, &path)?;

        info!("Stored {} as {}", document.original_name, file_name);
        Ok(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> SubmittedDocument {
        SubmittedDocument::new("RG frente.PDF", b"%PDF-1.4 identity".to_vec())
    }

    #[test]
    fn test_standard_file_name() {
        let name = standard_file_name(
            &document(),
            "529.982.247-25",
            "Maria Conceição da Silva Albuquerque",
            DocumentType::Identity,
            20,
        )
        .unwrap();
        assert_eq!(name, "52998224725_mariaconceiodasilvaa_identity.pdf");
    }

    #[test]
    fn test_standard_file_name_requires_tax_digits() {
        let result = standard_file_name(&document(), "", "Maria", DocumentType::Identity, 20);
        assert!(matches!(result, Err(StorageError::InvalidName { .. })));
    }

    #[test]
    fn test_store_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path().join("stored"), 20);

        let stored = store
            .store(&document(), "529.982.247-25", "Maria Silva", DocumentType::BirthCertificate)
            .unwrap();

        assert_eq!(stored, "52998224725_mariasilva_birth_certificate.pdf");
        let written = fs::read(store.dir().join(&stored)).unwrap();
        assert_eq!(written, document().data);
    }

    #[test]
    fn test_store_same_contents_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path(), 20);

        let first = store
            .store(&document(), "529.982.247-25", "Maria Silva", DocumentType::Identity)
            .unwrap();
        let second = store
            .store(&document(), "529.982.247-25", "Maria Silva", DocumentType::Identity)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_store_collision_with_different_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path(), 20);
        store
            .store(&document(), "529.982.247-25", "Maria Silva", DocumentType::Identity)
            .unwrap();

        let other = SubmittedDocument::new("rg.pdf", b"%PDF-1.4 other".to_vec());
        let result = store.store(&other, "529.982.247-25", "Maria Silva", DocumentType::Identity);
        assert!(matches!(result, Err(StorageError::Collision(_))));
    }

    #[test]
    fn test_store_replaces_leftover_partial_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDocumentStore::new(dir.path(), 20);
        let partial = dir.path().join(".52998224725_mariasilva_identity.pdf.partial");
        fs::write(&partial, b"%PDF-1.4 ide").unwrap();

        let stored = store
            .store(&document(), "529.982.247-25", "Maria Silva", DocumentType::Identity)
            .unwrap();

        assert_eq!(fs::read(dir.path().join(&stored)).unwrap(), document().data);
        assert!(!partial.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
