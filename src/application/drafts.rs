//! Write-through mirroring of the live draft into the durable slot.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, warn};

use crate::application::metrics::{METRIC_DRAFT_RESTORE_DISCARDED, METRIC_DRAFT_SAVE_FAILED};
use crate::application::ports::{DraftStore, DraftStoreError};
use crate::domain::draft::{DraftRecord, PostDraft};

const SOURCE: &str = "application::drafts";

/// Draft persistence policy on top of a [`DraftStore`].
///
/// Storage failures never reach the author: a failed save or clear is logged
/// and authoring carries on, and an unreadable slot restores as empty.
#[derive(Clone)]
pub struct DraftPersistence {
    store: Arc<dyn DraftStore>,
}

impl DraftPersistence {
    pub fn new(store: Arc<dyn DraftStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, draft: &PostDraft) {
        let record = DraftRecord::from(draft);
        if let Err(err) = self.store.save(&record) {
            counter!(METRIC_DRAFT_SAVE_FAILED).increment(1);
            warn!(
                target = SOURCE,
                slot = self.store.slot(),
                error = %err,
                "failed to save draft"
            );
        }
    }

    pub fn restore(&self) -> Option<PostDraft> {
        match self.store.restore() {
            Ok(Some(record)) => {
                debug!(target = SOURCE, slot = self.store.slot(), "restored draft");
                Some(PostDraft::from(record))
            }
            Ok(None) => None,
            Err(err @ DraftStoreError::Corrupt(_)) => {
                counter!(METRIC_DRAFT_RESTORE_DISCARDED).increment(1);
                warn!(
                    target = SOURCE,
                    slot = self.store.slot(),
                    error = %err,
                    "discarding unreadable draft"
                );
                None
            }
            Err(err) => {
                warn!(
                    target = SOURCE,
                    slot = self.store.slot(),
                    error = %err,
                    "draft storage unavailable during restore"
                );
                None
            }
        }
    }

    pub fn clear(&self) {
        if let Err(err) = self.store.clear() {
            warn!(
                target = SOURCE,
                slot = self.store.slot(),
                error = %err,
                "failed to clear draft"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::draft::Thumbnail;
    use crate::domain::image::{ImageFile, PreviewRef};
    use crate::infra::drafts::MemoryDraftStore;

    struct BrokenStore;

    impl DraftStore for BrokenStore {
        fn slot(&self) -> &str {
            "broken"
        }

        fn save(&self, _record: &DraftRecord) -> Result<(), DraftStoreError> {
            Err(std::io::Error::other("quota exceeded").into())
        }

        fn restore(&self) -> Result<Option<DraftRecord>, DraftStoreError> {
            Err(std::io::Error::other("unavailable").into())
        }

        fn clear(&self) -> Result<(), DraftStoreError> {
            Err(std::io::Error::other("unavailable").into())
        }
    }

    #[test]
    fn save_then_restore_drops_only_the_file() {
        let drafts = DraftPersistence::new(Arc::new(MemoryDraftStore::default()));
        let file = ImageFile::new("cover.png", "image/png", vec![1u8, 2, 3]);
        let draft = PostDraft {
            title: "Title".into(),
            content: "Body".into(),
            tags: "a, b".into(),
            meta: "Meta".into(),
            featured: true,
            thumbnail: Thumbnail::Local {
                preview: PreviewRef::local(&file),
                file,
            },
        };

        drafts.save(&draft);
        assert_eq!(drafts.restore(), Some(draft.persistable()));
    }

    #[test]
    fn corrupt_slot_restores_as_empty() {
        let store = Arc::new(MemoryDraftStore::with_raw("{not json"));
        let drafts = DraftPersistence::new(store);
        assert_eq!(drafts.restore(), None);
    }

    #[test]
    fn clear_empties_the_slot() {
        let drafts = DraftPersistence::new(Arc::new(MemoryDraftStore::default()));
        drafts.save(&PostDraft {
            title: "t".into(),
            ..PostDraft::default()
        });
        drafts.clear();
        assert_eq!(drafts.restore(), None);
    }

    #[test]
    fn storage_failures_are_swallowed() {
        let drafts = DraftPersistence::new(Arc::new(BrokenStore));
        drafts.save(&PostDraft::default());
        drafts.clear();
        assert_eq!(drafts.restore(), None);
    }
}
