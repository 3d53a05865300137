//! REST handlers for the book catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use std::sync::Arc;

use crate::catalog::{Book, BookCatalog, SortDirection, SortSpec};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub sort: Option<String>,
    pub dir: Option<SortDirection>,
}

pub async fn list_books(
    State(catalog): State<Arc<BookCatalog>>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let sort = query.sort.map(|property| SortSpec {
        property,
        direction: query.dir.unwrap_or(SortDirection::Asc),
    });
    Json(catalog.list(sort.as_ref()).await)
}

pub async fn create_book(
    State(catalog): State<Arc<BookCatalog>>,
    Json(book): Json<Book>,
) -> impl IntoResponse {
    let created = catalog.create(book).await;
    (StatusCode::CREATED, Json(created))
}

pub async fn read_book(
    State(catalog): State<Arc<BookCatalog>>,
    Path(id): Path<i32>,
) -> Response {
    match catalog.read(id).await {
        Some(book) => Json(book).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn update_book(
    State(catalog): State<Arc<BookCatalog>>,
    Path(id): Path<i32>,
    Json(mut book): Json<Book>,
) -> Response {
    // the path wins over whatever id the body carries
    book.id = id;
    if catalog.update(book.clone()).await {
        Json(book).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

pub async fn delete_book(
    State(catalog): State<Arc<BookCatalog>>,
    Path(id): Path<i32>,
) -> StatusCode {
    if catalog.delete(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
