//! Admin routes for pages, products and home pages.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::content::{LinkTable, ListingFilter};
use crate::error::{AppError, AppResult};
use crate::models::{HomePage, HomePageForm, Page, PageForm, Product, ProductForm};
use crate::state::AppState;

use super::helpers::{AdminRow, LangQuery, with_thumbnail, with_thumbnails};

/// Create the content admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/page/", get(list_pages).post(create_page))
        .route(
            "/admin/page/{id}/",
            get(get_page).put(update_page).delete(delete_page),
        )
        .route("/admin/product/", get(list_products).post(create_product))
        .route(
            "/admin/product/{id}/",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/admin/homepage/", get(list_home_pages).post(create_home_page))
        .route(
            "/admin/homepage/{id}/",
            get(get_home_page)
                .put(update_home_page)
                .delete(delete_home_page),
        )
}

// =============================================================================
// Response types
// =============================================================================

/// A page or product with the ids of its related objects.
#[derive(Debug, Serialize)]
struct WithRelations<T> {
    #[serde(flatten)]
    record: T,
    images: Vec<i64>,
    categories: Vec<i64>,
    tags: Vec<i64>,
}

/// A home page with the ids of its related objects.
#[derive(Debug, Serialize)]
struct HomePageDetail {
    #[serde(flatten)]
    home: HomePage,
    images: Vec<i64>,
    products: Vec<i64>,
}

async fn relations<T>(
    state: &AppState,
    record: T,
    id: i64,
    links: [LinkTable; 3],
) -> AppResult<WithRelations<T>> {
    let [images, categories, tags] = links;
    let (images, categories, tags) = tokio::try_join!(
        images.targets(state.db(), id),
        categories.targets(state.db(), id),
        tags.targets(state.db(), id),
    )?;
    Ok(WithRelations {
        record,
        images,
        categories,
        tags,
    })
}

const PAGE_LINKS: [LinkTable; 3] = [
    LinkTable::PageImage,
    LinkTable::PageCategory,
    LinkTable::PageTag,
];

const PRODUCT_LINKS: [LinkTable; 3] = [
    LinkTable::ProductImage,
    LinkTable::ProductCategory,
    LinkTable::ProductTag,
];

// =============================================================================
// Page handlers
// =============================================================================

/// GET /admin/page/?lang=
async fn list_pages(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> AppResult<Json<Vec<AdminRow<Page>>>> {
    let filter = ListingFilter {
        lang: query.resolve(&state)?,
        ..ListingFilter::default()
    };
    let pages = Page::list(state.db(), &filter).await?;
    Ok(Json(with_thumbnails(&state, pages, |p| p.image_id).await?))
}

async fn page_detail(
    state: &AppState,
    page: Page,
) -> AppResult<AdminRow<WithRelations<Page>>> {
    let image_id = page.image_id;
    let id = page.id;
    let detail = relations(state, page, id, PAGE_LINKS).await?;
    with_thumbnail(state, detail, image_id).await
}

/// GET /admin/page/{id}/
async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AdminRow<WithRelations<Page>>>> {
    let page = Page::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(page_detail(&state, page).await?))
}

/// POST /admin/page/
async fn create_page(
    State(state): State<AppState>,
    Json(form): Json<PageForm>,
) -> AppResult<(StatusCode, Json<AdminRow<WithRelations<Page>>>)> {
    let input = form.resolve(state.languages())?;
    let page = Page::create(state.db(), &input)
        .await
        .map_err(AppError::from_write)?;
    Ok((StatusCode::CREATED, Json(page_detail(&state, page).await?)))
}

/// PUT /admin/page/{id}/
async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<PageForm>,
) -> AppResult<Json<AdminRow<WithRelations<Page>>>> {
    let input = form.resolve(state.languages())?;
    let page = Page::update(state.db(), id, &input)
        .await
        .map_err(AppError::from_write)?
        .ok_or(AppError::NotFound)?;
    Ok(Json(page_detail(&state, page).await?))
}

/// DELETE /admin/page/{id}/
async fn delete_page(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !Page::delete(state.db(), id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(id, "deleted page");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Product handlers
// =============================================================================

/// GET /admin/product/?lang=
async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> AppResult<Json<Vec<AdminRow<Product>>>> {
    let filter = ListingFilter {
        lang: query.resolve(&state)?,
        ..ListingFilter::default()
    };
    let products = Product::list(state.db(), &filter).await?;
    Ok(Json(with_thumbnails(&state, products, |p| p.image_id).await?))
}

async fn product_detail(
    state: &AppState,
    product: Product,
) -> AppResult<AdminRow<WithRelations<Product>>> {
    let image_id = product.image_id;
    let id = product.id;
    let detail = relations(state, product, id, PRODUCT_LINKS).await?;
    with_thumbnail(state, detail, image_id).await
}

/// GET /admin/product/{id}/
async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AdminRow<WithRelations<Product>>>> {
    let product = Product::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(product_detail(&state, product).await?))
}

/// POST /admin/product/
async fn create_product(
    State(state): State<AppState>,
    Json(form): Json<ProductForm>,
) -> AppResult<(StatusCode, Json<AdminRow<WithRelations<Product>>>)> {
    let input = form.resolve(state.languages())?;
    let product = Product::create(state.db(), &input)
        .await
        .map_err(AppError::from_write)?;
    Ok((StatusCode::CREATED, Json(product_detail(&state, product).await?)))
}

/// PUT /admin/product/{id}/
async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<ProductForm>,
) -> AppResult<Json<AdminRow<WithRelations<Product>>>> {
    let input = form.resolve(state.languages())?;
    let product = Product::update(state.db(), id, &input)
        .await
        .map_err(AppError::from_write)?
        .ok_or(AppError::NotFound)?;
    Ok(Json(product_detail(&state, product).await?))
}

/// DELETE /admin/product/{id}/
async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if !Product::delete(state.db(), id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(id, "deleted product");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Home page handlers
// =============================================================================

/// GET /admin/homepage/?lang=
async fn list_home_pages(
    State(state): State<AppState>,
    Query(query): Query<LangQuery>,
) -> AppResult<Json<Vec<HomePage>>> {
    let lang = query.resolve(&state)?;
    Ok(Json(HomePage::list(state.db(), lang.as_deref()).await?))
}

async fn home_page_detail(state: &AppState, home: HomePage) -> AppResult<HomePageDetail> {
    let (images, products) = tokio::try_join!(
        LinkTable::HomePageImage.targets(state.db(), home.id),
        LinkTable::HomePageProduct.targets(state.db(), home.id),
    )?;
    Ok(HomePageDetail {
        home,
        images,
        products,
    })
}

/// GET /admin/homepage/{id}/
async fn get_home_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<HomePageDetail>> {
    let home = HomePage::find_by_id(state.db(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(home_page_detail(&state, home).await?))
}

/// POST /admin/homepage/
async fn create_home_page(
    State(state): State<AppState>,
    Json(form): Json<HomePageForm>,
) -> AppResult<(StatusCode, Json<HomePageDetail>)> {
    let input = form.resolve(state.languages())?;
    let home = HomePage::create(state.db(), &input)
        .await
        .map_err(AppError::from_write)?;
    Ok((StatusCode::CREATED, Json(home_page_detail(&state, home).await?)))
}

/// PUT /admin/homepage/{id}/
async fn update_home_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<HomePageForm>,
) -> AppResult<Json<HomePageDetail>> {
    let input = form.resolve(state.languages())?;
    let home = HomePage::update(state.db(), id, &input)
        .await
        .map_err(AppError::from_write)?
        .ok_or(AppError::NotFound)?;
    Ok(Json(home_page_detail(&state, home).await?))
}

/// DELETE /admin/homepage/{id}/
async fn delete_home_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if !HomePage::delete(state.db(), id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(id, "deleted home page");
    Ok(StatusCode::NO_CONTENT)
}
