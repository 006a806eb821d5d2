use crate::controller;
use crate::errors::{AppError, ReadingError};
use crate::models::{Hizb, OpenOutcome, ProgressResponse, ReaderPane, SelectRequest, SurahRange};
use crate::state::{AppState, Session};
use crate::stats::build_summary;
use crate::ui::render_index;
use axum::{
    Form, Json,
    extract::{Path, State},
    response::{Html, Redirect},
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.session.lock().await;
    let summary = build_summary(&session.progress);
    Html(render_index(&session, &summary))
}

pub async fn open_form(
    State(state): State<AppState>,
    Form(payload): Form<SelectRequest>,
) -> Result<Redirect, AppError> {
    let hizb = parse_hizb(payload.hizb)?;
    controller::select(&state, hizb).await;
    Ok(Redirect::to("/"))
}

pub async fn done_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    controller::mark_done(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn undo_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    controller::undo(&state).await?;
    Ok(Redirect::to("/"))
}

pub async fn get_progress(State(state): State<AppState>) -> Json<ProgressResponse> {
    let session = state.session.lock().await;
    Json(progress_response(&session))
}

pub async fn select(
    State(state): State<AppState>,
    Json(payload): Json<SelectRequest>,
) -> Result<Json<OpenOutcome>, AppError> {
    let hizb = parse_hizb(payload.hizb)?;
    Ok(Json(controller::select(&state, hizb).await))
}

pub async fn mark_done(State(state): State<AppState>) -> Result<Json<ProgressResponse>, AppError> {
    controller::mark_done(&state).await?;
    Ok(get_progress(State(state)).await)
}

pub async fn undo(State(state): State<AppState>) -> Result<Json<ProgressResponse>, AppError> {
    controller::undo(&state).await?;
    Ok(get_progress(State(state)).await)
}

pub async fn get_reader(State(state): State<AppState>) -> Json<ReaderPane> {
    let session = state.session.lock().await;
    Json(session.pane.clone())
}

pub async fn get_ranges(
    State(state): State<AppState>,
    Path(number): Path<u32>,
) -> Result<Json<Vec<SurahRange>>, AppError> {
    let hizb = parse_hizb(number)?;
    let mapping = state.session.lock().await.mapping.clone();
    let mapping = mapping.map_err(ReadingError::MappingUnavailable)?;
    let ranges = mapping.resolve(hizb).map_err(ReadingError::from)?;
    Ok(Json(ranges))
}

fn parse_hizb(number: u32) -> Result<Hizb, AppError> {
    Hizb::new(number).ok_or_else(|| AppError::bad_request("hizb must be between 1 and 60"))
}

fn progress_response(session: &Session) -> ProgressResponse {
    ProgressResponse {
        done: session.progress.as_slice().to_vec(),
        selected: session.selected,
        summary: build_summary(&session.progress),
    }
}
