use crate::errors::AppError;
use crate::logbook::Logbook;
use crate::models::{
    CategorySummary, ClearForm, ClearRequest, ClearResponse, CodeCount, EntryRequest, EntryResponse,
    LogResponse, SummaryResponse,
};
use crate::state::{AppState, ScoutData};
use crate::stats::{compute_frequencies, compute_percentage, compute_score};
use crate::storage::persist_store;
use crate::summary::{
    build_summary, export_log, EMPTY_LOG_MESSAGE, EMPTY_SUMMARY_MESSAGE, LOG_FILENAME,
    SUMMARY_FILENAME,
};
use crate::ui::{render_clear_confirm, render_index};
use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use tracing::{debug, info};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    let frequencies = compute_frequencies(&state.config, data.log.text());
    Html(render_index(&state.config, &data.log, &frequencies))
}

pub async fn get_log(State(state): State<AppState>) -> Json<LogResponse> {
    let data = state.data.lock().await;
    Json(LogResponse {
        text: data.log.text().to_string(),
        lines: data.log.line_count(),
    })
}

pub async fn add_entry(
    State(state): State<AppState>,
    Json(payload): Json<EntryRequest>,
) -> Result<Json<EntryResponse>, AppError> {
    let response = apply_entry(&state, &payload.code).await?;
    Ok(Json(response))
}

pub async fn click_form(
    State(state): State<AppState>,
    Form(payload): Form<EntryRequest>,
) -> Result<Redirect, AppError> {
    apply_entry(&state, &payload.code).await?;
    Ok(Redirect::to("/"))
}

pub async fn clear(
    State(state): State<AppState>,
    Json(payload): Json<ClearRequest>,
) -> Result<Json<ClearResponse>, AppError> {
    let response = apply_clear(&state, payload.confirm).await?;
    Ok(Json(response))
}

pub async fn confirm_clear_page(State(state): State<AppState>) -> Html<String> {
    let data = state.data.lock().await;
    Html(render_clear_confirm(data.log.line_count()))
}

/// Only an explicit `confirm=yes` from the confirmation page wipes the log.
pub async fn clear_form(
    State(state): State<AppState>,
    Form(payload): Form<ClearForm>,
) -> Result<Redirect, AppError> {
    let confirmed = payload.confirm.as_deref() == Some("yes");
    apply_clear(&state, confirmed).await?;
    Ok(Redirect::to("/"))
}

pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    let config = &state.config;
    let data = state.data.lock().await;
    let frequencies = compute_frequencies(config, data.log.text());
    let grand_total = frequencies.grand_total();

    let counts = config
        .entry_codes()
        .zip(frequencies.counts())
        .map(|((_, code), &count)| CodeCount { code, count })
        .collect();
    let categories = config
        .categories
        .iter()
        .zip(frequencies.totals())
        .enumerate()
        .map(|(index, (category, &total))| {
            let score = compute_score(config, index, &frequencies);
            CategorySummary {
                category: category.code.clone(),
                label: category.label.clone(),
                total,
                score: score.to_string(),
                score_value: score.as_f64(),
                percent: compute_percentage(total, grand_total),
            }
        })
        .collect();

    Json(SummaryResponse {
        counts,
        categories,
        grand_total,
    })
}

pub async fn download_log(State(state): State<AppState>) -> Result<Response, AppError> {
    let data = state.data.lock().await;
    let content =
        export_log(data.log.text()).ok_or_else(|| AppError::nothing_to_export(EMPTY_LOG_MESSAGE))?;
    Ok(csv_attachment(LOG_FILENAME, content))
}

pub async fn download_summary(State(state): State<AppState>) -> Result<Response, AppError> {
    let data = state.data.lock().await;
    let content = build_summary(&state.config, data.log.text())?
        .ok_or_else(|| AppError::nothing_to_export(EMPTY_SUMMARY_MESSAGE))?;
    Ok(csv_attachment(SUMMARY_FILENAME, content))
}

async fn apply_entry(state: &AppState, raw: &str) -> Result<EntryResponse, AppError> {
    let config = &state.config;
    let Some(entry) = config.parse_entry(raw) else {
        return Err(AppError::bad_request(format!("unknown entry code '{}'", raw.trim())));
    };

    let mut data = state.data.lock().await;
    let mut log = data.log.clone();
    let line = log.append(config, entry);
    commit(state, &mut data, log).await?;
    debug!("logged {}", line.trim_end());

    let frequencies = compute_frequencies(config, data.log.text());
    let category = &config.categories[entry.category];
    Ok(EntryResponse {
        line,
        category: category.code.clone(),
        label: category.label.clone(),
        color: category.color.clone(),
        score: compute_score(config, entry.category, &frequencies).to_string(),
    })
}

async fn apply_clear(state: &AppState, confirmed: bool) -> Result<ClearResponse, AppError> {
    let mut data = state.data.lock().await;
    let mut log = data.log.clone();
    if !log.clear(confirmed) {
        debug!("clear not confirmed, log kept");
        return Ok(ClearResponse {
            cleared: false,
            text: data.log.text().to_string(),
        });
    }

    commit(state, &mut data, log).await?;
    info!("scouting log cleared");
    Ok(ClearResponse {
        cleared: true,
        text: String::new(),
    })
}

/// Persists `log` first and only then swaps it in, so a failed write leaves
/// memory and disk in agreement.
async fn commit(state: &AppState, data: &mut ScoutData, log: Logbook) -> Result<(), AppError> {
    let mut store = data.store.clone();
    log.write_to(&mut store);
    persist_store(&state.data_path, &store).await?;
    data.store = store;
    data.log = log;
    Ok(())
}

fn csv_attachment(filename: &str, content: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        content,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoutConfig;
    use crate::logbook::LOG_KEY;
    use crate::models::KeyValueStore;
    use axum::http::StatusCode;
    use std::path::PathBuf;

    const SEEDED_LOG: &str = "1/3/2026 10:00:00;A+\n";

    fn seeded_state(data_path: PathBuf) -> AppState {
        let mut store = KeyValueStore::default();
        store.set(LOG_KEY, SEEDED_LOG.into());
        store.set("theme", "dark".into());
        AppState::new(data_path, ScoutConfig::default(), store)
    }

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("scout_logger_handlers_{}_{name}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn failed_write_leaves_log_and_store_untouched() {
        // A directory cannot be written as a file.
        let state = seeded_state(std::env::temp_dir());
        let before = {
            let data = state.data.lock().await;
            (data.log.clone(), data.store.clone())
        };

        let err = add_entry(State(state.clone()), Json(EntryRequest { code: "B=".into() }))
            .await
            .err()
            .expect("append should fail");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let err = clear(State(state.clone()), Json(ClearRequest { confirm: true }))
            .await
            .err()
            .expect("clear should fail");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let data = state.data.lock().await;
        assert_eq!(data.log, before.0);
        assert_eq!(data.store, before.1);
        assert_eq!(data.log.text(), SEEDED_LOG);
    }

    #[tokio::test]
    async fn clear_form_needs_explicit_yes() {
        let path = temp_path("clear_form");
        let state = seeded_state(path.clone());

        for confirm in [None, Some("no".to_string()), Some("on".to_string())] {
            clear_form(State(state.clone()), Form(ClearForm { confirm }))
                .await
                .map_err(|err| err.message)
                .unwrap();
            assert_eq!(state.data.lock().await.log.text(), SEEDED_LOG);
        }

        clear_form(
            State(state.clone()),
            Form(ClearForm {
                confirm: Some("yes".into()),
            }),
        )
        .await
        .map_err(|err| err.message)
        .unwrap();
        let data = state.data.lock().await;
        assert_eq!(data.log.text(), "");
        assert_eq!(data.store.get(LOG_KEY), Some(""));
        assert_eq!(data.store.get("theme"), Some("dark"));
        drop(data);
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn unknown_code_is_a_bad_request() {
        let state = seeded_state(temp_path("unknown"));
        let err = add_entry(State(state.clone()), Json(EntryRequest { code: "Q?".into() }))
            .await
            .err()
            .expect("unknown code should fail");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(state.data.lock().await.log.text(), SEEDED_LOG);
    }
}
