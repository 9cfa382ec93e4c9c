use crate::app::car_service::BrowseQuery;
use crate::domain::CarDraft;
use crate::transport::http::error::AppError;
use crate::transport::http::params::{non_blank, parse_form_id, parse_id, parse_page};
use crate::transport::http::types::{AppState, CarForm, IndexParams};
use crate::view::render_index;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;

/// `GET /`: delete-then-redirect when `delete` is given, otherwise the list page.
pub async fn index_handler(
    State(state): State<AppState>,
    params: Result<Query<IndexParams>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(params) = params.map_err(|e| AppError::Malformed(e.body_text()))?;

    if let Some(raw) = non_blank(params.delete.as_deref()) {
        let id = parse_id("delete", raw)?;
        state.service.remove(id).await?;
        return Ok(Redirect::to("/").into_response());
    }

    let query = BrowseQuery {
        search: params.search.as_deref().unwrap_or("").trim().to_string(),
        page: parse_page(params.page.as_deref())?,
        edit: non_blank(params.edit.as_deref())
            .map(|raw| parse_id("edit", raw))
            .transpose()?,
    };

    let view = state.service.browse(query).await?;
    Ok(Html(render_index(&view)).into_response())
}

/// `POST /`: insert (no id) or update (id), then redirect back to the list.
pub async fn submit_handler(
    State(state): State<AppState>,
    form: Result<Form<CarForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(form) = form.map_err(|e| AppError::Malformed(e.body_text()))?;

    let id = parse_form_id(form.id.as_deref())?;
    let draft = CarDraft::parse(
        form.brand.as_deref(),
        form.model.as_deref(),
        form.year.as_deref(),
        form.price.as_deref(),
    )?;

    state.service.save(id, &draft).await?;
    Ok(Redirect::to("/").into_response())
}
