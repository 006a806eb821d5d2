use crate::errors::{ReadingError, StorageError};
use crate::models::{Hizb, OpenOutcome, ReaderPane, Status};
use crate::reader::load_blocks;
use crate::state::AppState;
use tracing::{debug, info, warn};

/// Selects `hizb`, loads its text and commits the result to the reading pane
/// unless another selection happened in the meantime.
pub async fn select(state: &AppState, hizb: Hizb) -> OpenOutcome {
    let (token, mapping) = {
        let mut session = state.session.lock().await;
        session.selected = Some(hizb);
        session.token += 1;
        session.pane = ReaderPane::Loading { hizb };
        session.status = Status::info(format!("Loading hizb {hizb}..."));
        (session.token, session.mapping.clone())
    };
    info!(hizb = hizb.number(), token, "opening hizb");

    let result = match mapping {
        Ok(mapping) => load_blocks(&mapping, &state.verses, hizb).await,
        Err(message) => Err(ReadingError::MappingUnavailable(message)),
    };

    let (pane, status) = match result {
        Ok(blocks) => (
            ReaderPane::Ready { hizb, blocks },
            Status::ok(format!("Hizb {hizb} is ready. Read it, then mark it done.")),
        ),
        Err(err) => {
            warn!(hizb = hizb.number(), "failed to open hizb: {err}");
            (
                ReaderPane::Failed {
                    hizb: Some(hizb),
                    kind: err.kind(),
                    message: err.to_string(),
                },
                Status::error(format!("Could not open hizb {hizb}. Select it again to retry.")),
            )
        }
    };

    let mut session = state.session.lock().await;
    if session.token != token {
        debug!(
            hizb = hizb.number(),
            token,
            current = session.token,
            "discarding superseded hizb result"
        );
        return OpenOutcome {
            hizb,
            committed: false,
            pane,
        };
    }

    session.pane = pane.clone();
    session.status = status;
    OpenOutcome {
        hizb,
        committed: true,
        pane,
    }
}

/// Marks the selected hizb as read. Returns whether anything changed.
pub async fn mark_done(state: &AppState) -> Result<bool, StorageError> {
    set_done(state, true).await
}

/// Clears the read mark on the selected hizb. Returns whether anything changed.
pub async fn undo(state: &AppState) -> Result<bool, StorageError> {
    set_done(state, false).await
}

async fn set_done(state: &AppState, done: bool) -> Result<bool, StorageError> {
    // Serializes writers so the saved copy is always the latest one.
    let _writer = state.progress_writer.lock().await;

    let (hizb, mut progress) = {
        let session = state.session.lock().await;
        let Some(hizb) = session.selected else {
            debug!("no hizb selected; ignoring");
            return Ok(false);
        };
        (hizb, session.progress.clone())
    };
    if !progress.set(hizb, done) {
        return Ok(false);
    }

    state.progress_store.save(&progress).await?;
    info!(hizb = hizb.number(), done, "progress saved");

    let mut session = state.session.lock().await;
    session.progress = progress;
    session.status = if done {
        Status::ok(format!("Hizb {hizb} marked as read."))
    } else {
        Status::ok(format!("Hizb {hizb} unmarked."))
    };
    Ok(true)
}
