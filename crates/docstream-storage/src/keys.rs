//! Shared key generation for storage backends.

use docstream_core::constants::DOCUMENTS_BASE_PATH;
use uuid::Uuid;

/// Storage key for a document blob: `documents/{document_id}`.
///
/// All backends and callers must use this format; the key is the only link
/// between a metadata row and its blob.
pub fn document_key(document_id: Uuid) -> String {
    format!("{}/{}", DOCUMENTS_BASE_PATH, document_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_key_format() {
        let id = Uuid::new_v4();
        let key = document_key(id);
        assert_eq!(key, format!("documents/{}", id));
        assert!(!key.starts_with('/'));
    }
}
