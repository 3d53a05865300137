//! In-memory bibliographic catalog. Plain CRUD over an auto-incrementing
//! integer key; shares nothing with the signaling core.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{self, AtomicI32};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub id: i32,
    pub title: String,
    pub isbn: String,
    pub link: String,
    pub publisher: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sort descriptor for catalog listings.
#[derive(Debug, Clone)]
pub struct SortSpec {
    pub property: String,
    pub direction: SortDirection,
}

/// Book store backed by a map and an atomic id counter. Ids start at 1 and
/// are never reused within a process.
#[derive(Default)]
pub struct BookCatalog {
    books: RwLock<HashMap<i32, Book>>,
    last_id: AtomicI32,
}

impl BookCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog pre-populated with the stock record set.
    pub fn with_seed() -> Self {
        let mut books = HashMap::new();
        let mut last_id = 0;
        for (title, isbn, link, publisher) in SEED_BOOKS {
            last_id += 1;
            books.insert(
                last_id,
                Book {
                    id: last_id,
                    title: (*title).to_owned(),
                    isbn: (*isbn).to_owned(),
                    link: (*link).to_owned(),
                    publisher: (*publisher).to_owned(),
                },
            );
        }
        Self {
            books: RwLock::new(books),
            last_id: AtomicI32::new(last_id),
        }
    }

    pub async fn list(&self, sort: Option<&SortSpec>) -> Vec<Book> {
        let mut books: Vec<Book> = self.books.read().await.values().cloned().collect();
        match sort {
            Some(spec) => sort_books(&mut books, spec),
            None => books.sort_by_key(|b| b.id),
        }
        books
    }

    pub async fn create(&self, mut book: Book) -> Book {
        book.id = self.last_id.fetch_add(1, atomic::Ordering::SeqCst) + 1;
        self.books.write().await.insert(book.id, book.clone());
        book
    }

    pub async fn read(&self, id: i32) -> Option<Book> {
        self.books.read().await.get(&id).cloned()
    }

    /// Replace the record with the same id. Returns false if no such record
    /// exists.
    pub async fn update(&self, book: Book) -> bool {
        let mut books = self.books.write().await;
        match books.get_mut(&book.id) {
            Some(slot) => {
                *slot = book;
                true
            }
            None => false,
        }
    }

    pub async fn delete(&self, id: i32) -> bool {
        self.books.write().await.remove(&id).is_some()
    }
}

fn sort_books(books: &mut [Book], spec: &SortSpec) {
    let by_property = |a: &Book, b: &Book| -> Ordering {
        match spec.property.as_str() {
            "title" => a.title.cmp(&b.title),
            "isbn" => a.isbn.cmp(&b.isbn),
            "link" => a.link.cmp(&b.link),
            "publisher" => a.publisher.cmp(&b.publisher),
            _ => a.id.cmp(&b.id),
        }
    };
    books.sort_by(|a, b| match spec.direction {
        SortDirection::Asc => by_property(a, b),
        SortDirection::Desc => by_property(b, a),
    });
}

const SEED_BOOKS: &[(&str, &str, &str, &str)] = &[
    (
        "Sencha Touch in Action",
        "9781617290374",
        "http://www.manning.com/garcia2/",
        "Manning",
    ),
    (
        "Ext JS in Action, Second Edition",
        "9781617290329",
        "http://www.manning.com/garcia3/",
        "Manning",
    ),
    (
        "Learning Ext JS 4",
        "9781849516846",
        "http://www.packtpub.com/learning-ext-javascript-4/book",
        "Packt",
    ),
    (
        "Sencha MVC Architecture",
        "9781849518888",
        "http://www.packtpub.com/sencha-model-view-controller-architecture/book",
        "Packt",
    ),
    (
        "Creating Mobile Apps with Sencha Touch 2",
        "9781849518901",
        "http://www.packtpub.com/creating-mobile-apps-with-sencha-touch-2/book",
        "Packt",
    ),
    (
        "Sencha Touch Cookbook, Second Edition",
        "9781782169185",
        "http://www.packtpub.com/sencha-touch-cookbook-second-edition/book",
        "Packt",
    ),
    (
        "Instant Sencha Touch",
        "9781782165989",
        "http://www.packtpub.com/build-native-applications-with-sencha-touch/book",
        "Packt",
    ),
    (
        "Sencha Architect App Development",
        "9781782169819",
        "http://www.packtpub.com/sencha-architect-app-development/book",
        "Packt",
    ),
    (
        "Instant Ext JS Starter",
        "9781782166108",
        "http://www.packtpub.com/ext-js-starter/book",
        "Packt",
    ),
    (
        "Ext JS 4 Plugin and Extension Development",
        "9781782163725",
        "http://www.packtpub.com/ext-js-4-plugin-and-extension-development/book",
        "Packt",
    ),
    (
        "Ext JS 4 Web Application Development Cookbook",
        "9781849516860",
        "http://www.packtpub.com/sencha-ext-js-4-web-application-development-cookbook/book",
        "Packt",
    ),
    (
        "Ext JS 4 First Look",
        "9781849516662",
        "http://www.packtpub.com/ext-js-4-first-look/book",
        "Packt",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn book(title: &str) -> Book {
        Book {
            id: 0,
            title: title.to_owned(),
            isbn: "0000000000000".to_owned(),
            link: "http://example.com".to_owned(),
            publisher: "Example".to_owned(),
        }
    }

    #[tokio::test]
    async fn create_assigns_increasing_ids() {
        let catalog = BookCatalog::new();
        let first = catalog.create(book("one")).await;
        let second = catalog.create(book("two")).await;

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(catalog.read(1).await.unwrap().title, "one");
    }

    #[tokio::test]
    async fn update_and_delete_report_absence() {
        let catalog = BookCatalog::new();
        let created = catalog.create(book("one")).await;

        let mut changed = created.clone();
        changed.title = "renamed".to_owned();
        assert!(catalog.update(changed).await);
        assert_eq!(catalog.read(created.id).await.unwrap().title, "renamed");

        let mut missing = created.clone();
        missing.id = 99;
        assert!(!catalog.update(missing).await);

        assert!(catalog.delete(created.id).await);
        assert!(!catalog.delete(created.id).await);
        assert!(catalog.read(created.id).await.is_none());
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let catalog = BookCatalog::new();
        let first = catalog.create(book("one")).await;
        catalog.delete(first.id).await;

        let second = catalog.create(book("two")).await;
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn seeded_catalog_continues_id_sequence() {
        let catalog = BookCatalog::with_seed();
        let seeded = catalog.list(None).await;
        assert_eq!(seeded.len(), 12);

        let next = catalog.create(book("thirteen")).await;
        assert_eq!(next.id as usize, seeded.len() + 1);
    }

    #[tokio::test]
    async fn list_respects_sort_descriptor() {
        let catalog = BookCatalog::new();
        catalog.create(book("banana")).await;
        catalog.create(book("apple")).await;
        catalog.create(book("cherry")).await;

        let spec = SortSpec {
            property: "title".to_owned(),
            direction: SortDirection::Asc,
        };
        let titles: Vec<String> = catalog
            .list(Some(&spec))
            .await
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["apple", "banana", "cherry"]);

        let spec = SortSpec {
            property: "title".to_owned(),
            direction: SortDirection::Desc,
        };
        let titles: Vec<String> = catalog
            .list(Some(&spec))
            .await
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["cherry", "banana", "apple"]);
    }
}
