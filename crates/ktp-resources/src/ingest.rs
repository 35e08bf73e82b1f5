//! Admission of incoming files as catalog records.

use std::collections::HashSet;

use ktp_core::{FileId, FileMetadata, FileRecord};

use crate::types::IncomingFile;

/// Turn a batch into new records, in input order, with ids fresh relative to
/// `existing` and to each other.
pub fn admit_batch(existing: &[FileRecord], batch: Vec<IncomingFile>) -> Vec<FileRecord> {
    admit_batch_with(existing, batch, FileId::generate)
}

/// [`admit_batch`] with a caller-supplied id generator. Generated ids that collide
/// are discarded and drawn again.
pub fn admit_batch_with<G>(
    existing: &[FileRecord],
    batch: Vec<IncomingFile>,
    mut generate: G,
) -> Vec<FileRecord>
where
    G: FnMut() -> FileId,
{
    let mut taken: HashSet<FileId> = existing.iter().map(|r| r.id().clone()).collect();

    batch
        .into_iter()
        .map(|file| {
            let id = loop {
                let candidate = generate();
                if taken.insert(candidate.clone()) {
                    break candidate;
                }
                tracing::debug!(id = %candidate, "Generated id already taken, drawing again");
            };
            let size = file.size();
            FileRecord::new(
                FileMetadata::new(id, file.name, size, file.mime_type),
                file.data,
            )
        })
        .collect()
}
