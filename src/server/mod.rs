mod books;
mod ws;

pub use ws::{ws_handler, SessionHub, SignalState};

use anyhow::Result;
use axum::{
    routing::{any, get},
    Router,
};
use std::sync::Arc;

use crate::catalog::BookCatalog;
use crate::registry::ConnectionRegistry;
use crate::signaling::SignalRouter;

pub struct SignalServer {
    addr: String,
    registry: Arc<ConnectionRegistry>,
    hub: Arc<SessionHub>,
    catalog: Arc<BookCatalog>,
}

impl SignalServer {
    pub fn new(addr: String) -> Self {
        Self {
            addr,
            registry: Arc::new(ConnectionRegistry::new()),
            hub: Arc::new(SessionHub::new()),
            catalog: Arc::new(BookCatalog::with_seed()),
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<BookCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        self.registry.clone()
    }

    /// Build the application router: the signaling WebSocket endpoint plus
    /// the catalog REST API.
    pub fn app(&self) -> Router {
        let router = Arc::new(SignalRouter::new(self.registry.clone(), self.hub.clone()));
        let signal_state = SignalState {
            hub: self.hub.clone(),
            router,
        };

        let signal_routes = Router::new()
            .route("/ws", any(ws_handler))
            .with_state(signal_state);

        let book_routes = Router::new()
            .route("/api/books", get(books::list_books).post(books::create_book))
            .route(
                "/api/books/:id",
                get(books::read_book)
                    .put(books::update_book)
                    .delete(books::delete_book),
            )
            .with_state(self.catalog.clone());

        signal_routes.merge(book_routes)
    }

    pub async fn run(self) -> Result<()> {
        let app = self.app();
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Book;
    use serde_json::json;

    async fn start_test_server(catalog: Arc<BookCatalog>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let app = SignalServer::new(addr.clone()).with_catalog(catalog).app();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        addr
    }

    #[tokio::test]
    async fn test_books_list_and_sort() {
        let addr = start_test_server(Arc::new(BookCatalog::with_seed())).await;
        let client = reqwest::Client::new();

        let books: Vec<Book> = client
            .get(format!("http://{}/api/books", addr))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(books.len(), 12);

        let sorted: Vec<Book> = client
            .get(format!("http://{}/api/books?sort=title&dir=desc", addr))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(sorted.len(), 12);
        let titles: Vec<&String> = sorted.iter().map(|b| &b.title).collect();
        let mut expected = titles.clone();
        expected.sort();
        expected.reverse();
        assert_eq!(titles, expected);
    }

    #[tokio::test]
    async fn test_books_crud_round_trip() {
        let addr = start_test_server(Arc::new(BookCatalog::new())).await;
        let client = reqwest::Client::new();

        // create
        let response = client
            .post(format!("http://{}/api/books", addr))
            .json(&json!({
                "title": "Programming Rust",
                "isbn": "9781492052593",
                "link": "https://www.oreilly.com/library/view/programming-rust-2nd/9781492052586/",
                "publisher": "O'Reilly"
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        let created: Book = response.json().await.unwrap();
        assert_eq!(created.id, 1);

        // read
        let fetched: Book = client
            .get(format!("http://{}/api/books/{}", addr, created.id))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(fetched, created);

        // update
        let mut changed = created.clone();
        changed.title = "Programming Rust, 2nd Edition".to_string();
        let response = client
            .put(format!("http://{}/api/books/{}", addr, created.id))
            .json(&changed)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        // delete
        let response = client
            .delete(format!("http://{}/api/books/{}", addr, created.id))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 204);

        // gone
        let response = client
            .get(format!("http://{}/api/books/{}", addr, created.id))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_books_unknown_id_is_404() {
        let addr = start_test_server(Arc::new(BookCatalog::new())).await;
        let client = reqwest::Client::new();

        let response = client
            .get(format!("http://{}/api/books/42", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 404);

        let response = client
            .delete(format!("http://{}/api/books/42", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }
}
