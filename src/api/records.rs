//! Record pages: list, create, detail, update and delete

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::{
    error::{AppError, AppResult},
    models::{FieldErrors, RecordForm, RecordQuery},
    services::records::today,
};

use super::pages::{self, FormAction, Notice};

fn notice_redirect(notice: Notice) -> Response {
    Redirect::to(&format!("/records/?notice={}", notice.code())).into_response()
}

/// Banner text for failures that leave the submitted form on screen
fn flash_message(err: &AppError) -> Option<String> {
    match err {
        AppError::NoData(message) | AppError::Validation(message) => Some(message.clone()),
        err if err.is_lookup_failure() => Some(format!(
            "Error fetching weather data: {}",
            err.public_message()
        )),
        _ => None,
    }
}

fn form_with_error(action: FormAction, form: &RecordForm, err: AppError) -> AppResult<Response> {
    match flash_message(&err) {
        Some(message) => {
            tracing::info!("Record form rejected: {}", message);
            Ok(pages::record_form(action, form, &FieldErrors::new(), Some(&message)).into_response())
        }
        None => Err(err),
    }
}

/// Paginated, searchable record list
pub async fn list_records(
    State(state): State<crate::AppState>,
    Query(query): Query<RecordQuery>,
) -> AppResult<Html<String>> {
    let (records, total) = state.services.records.list(&query).await?;
    Ok(pages::record_list(&records, total, &query))
}

pub async fn new_record() -> Html<String> {
    pages::record_form(FormAction::Create, &RecordForm::default(), &FieldErrors::new(), None)
}

/// Validate the form, fetch and aggregate fresh weather, then store
pub async fn create_record(
    State(state): State<crate::AppState>,
    Form(form): Form<RecordForm>,
) -> AppResult<Response> {
    let today = today();
    let input = match form.validate(today) {
        Ok(input) => input,
        Err(errors) => {
            tracing::debug!("Record form invalid: {}", errors.summary());
            return Ok(pages::record_form(FormAction::Create, &form, &errors, None).into_response());
        }
    };

    match state.services.records.create_on(&input, today).await {
        Ok(_) => Ok(notice_redirect(Notice::Created)),
        Err(e) => form_with_error(FormAction::Create, &form, e),
    }
}

pub async fn show_record(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Html<String>> {
    let record = state.services.records.get(id).await?;
    Ok(pages::record_detail(&record))
}

pub async fn edit_record(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Html<String>> {
    let record = state.services.records.get(id).await?;
    Ok(pages::record_form(
        FormAction::Update(id),
        &RecordForm::from_record(&record),
        &FieldErrors::new(),
        None,
    ))
}

/// Re-validate, re-fetch and re-aggregate an existing record
pub async fn update_record(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
    Form(form): Form<RecordForm>,
) -> AppResult<Response> {
    state.services.records.get(id).await?;

    let action = FormAction::Update(id);
    let today = today();
    let input = match form.validate(today) {
        Ok(input) => input,
        Err(errors) => return Ok(pages::record_form(action, &form, &errors, None).into_response()),
    };

    match state.services.records.update_on(id, &input, today).await {
        Ok(_) => Ok(notice_redirect(Notice::Updated)),
        Err(e) => form_with_error(action, &form, e),
    }
}

pub async fn confirm_delete(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Html<String>> {
    let record = state.services.records.get(id).await?;
    Ok(pages::record_confirm_delete(&record))
}

pub async fn delete_record(
    State(state): State<crate::AppState>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    state.services.records.delete(id).await?;
    Ok(notice_redirect(Notice::Deleted))
}
