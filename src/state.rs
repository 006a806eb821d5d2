use crate::errors::MappingError;
use crate::mapping::HizbMapping;
use crate::models::{FailureKind, Hizb, Progress, ReaderPane, Status};
use crate::storage::ProgressStore;
use crate::verses::SurahCache;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub progress_store: ProgressStore,
    pub session: Arc<Mutex<Session>>,
    pub verses: Arc<SurahCache>,
    /// Held for the whole copy-save-commit of a progress change.
    pub progress_writer: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(progress_store: ProgressStore, session: Session, verses: SurahCache) -> Self {
        Self {
            progress_store,
            session: Arc::new(Mutex::new(session)),
            verses: Arc::new(verses),
            progress_writer: Arc::new(Mutex::new(())),
        }
    }
}

const MAPPING_HINT: &str = "Check that HIZB_MAPPING_PATH points at a JSON file keyed \
    \"1\"..\"60\" or holding a list of 60 hizb records, each with a verse_mapping object.";

/// Everything one reader sees and changes.
#[derive(Debug)]
pub struct Session {
    pub mapping: Result<Arc<HizbMapping>, String>,
    pub progress: Progress,
    pub selected: Option<Hizb>,
    /// Bumped on every selection; an open only commits if it still matches.
    pub token: u64,
    pub pane: ReaderPane,
    pub status: Status,
}

impl Session {
    pub fn new(mapping: Result<HizbMapping, MappingError>, progress: Progress) -> Self {
        match mapping {
            Ok(mapping) => Self {
                status: Status::info(format!(
                    "Loaded the hizb mapping ({} of 60). Choose a hizb.",
                    mapping.len()
                )),
                mapping: Ok(Arc::new(mapping)),
                progress,
                selected: None,
                token: 0,
                pane: ReaderPane::Empty,
            },
            Err(err) => {
                let message = format!("{err}. {MAPPING_HINT}");
                Self {
                    pane: ReaderPane::Failed {
                        hizb: None,
                        kind: FailureKind::MappingUnavailable,
                        message: message.clone(),
                    },
                    status: Status::error("The hizb mapping could not be loaded."),
                    mapping: Err(message),
                    progress,
                    selected: None,
                    token: 0,
                }
            }
        }
    }

    pub fn can_mark_done(&self) -> bool {
        self.selected
            .is_some_and(|hizb| !self.progress.is_done(hizb))
    }

    pub fn can_undo(&self) -> bool {
        self.selected.is_some_and(|hizb| self.progress.is_done(hizb))
    }
}
