//! Shared route helpers: query parameters, request bodies and admin list rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::admin::image_display;
use crate::error::{AppError, AppResult};
use crate::models::Image;
use crate::state::AppState;

/// `?category=&tag=` filters of the public listings. Blank values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub category: Option<String>,
    pub tag: Option<String>,
}

/// `?lang=` filter of the admin lists.
#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

impl LangQuery {
    /// Blank means no filter; an unconfigured language is rejected.
    pub fn resolve(&self, state: &AppState) -> AppResult<Option<String>> {
        match self.lang.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(lang) if state.languages().contains(lang) => Ok(Some(lang.to_string())),
            Some(lang) => Err(AppError::BadRequest(format!("unknown language '{lang}'"))),
        }
    }
}

/// Body of `POST /admin/{model}/reorder/`.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<i64>,
}

/// An admin record with its cover thumbnail.
#[derive(Debug, Serialize)]
pub struct AdminRow<T> {
    #[serde(flatten)]
    pub record: T,
    pub image_display: String,
}

/// Attach cover thumbnails to admin list records, loading covers in one query.
pub async fn with_thumbnails<T>(
    state: &AppState,
    records: Vec<T>,
    cover: impl Fn(&T) -> Option<i64>,
) -> AppResult<Vec<AdminRow<T>>> {
    let mut ids: Vec<i64> = records.iter().filter_map(&cover).collect();
    ids.sort_unstable();
    ids.dedup();
    let images = Image::find_by_ids(state.db(), &ids).await?;

    Ok(records
        .into_iter()
        .map(|record| {
            let image_display = thumbnail(&images, cover(&record), state);
            AdminRow {
                record,
                image_display,
            }
        })
        .collect())
}

/// Attach the cover thumbnail to a single admin record.
pub async fn with_thumbnail<T>(
    state: &AppState,
    record: T,
    image_id: Option<i64>,
) -> AppResult<AdminRow<T>> {
    let images = match image_id {
        Some(id) => Image::find_by_ids(state.db(), &[id]).await?,
        None => HashMap::new(),
    };
    Ok(AdminRow {
        image_display: thumbnail(&images, image_id, state),
        record,
    })
}

fn thumbnail(images: &HashMap<i64, Image>, image_id: Option<i64>, state: &AppState) -> String {
    image_display(image_id.and_then(|id| images.get(&id)), state.media())
}
