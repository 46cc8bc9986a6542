pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Migration, Module};

pub use error::BookError;
pub use memory::InMemoryBookStore;
pub use models::{Book, BookId, CreateBook, UpdateTitle};
pub use postgres::PgBookStore;
pub use store::{BookStore, SharedBookStore, LIST_FILTERED_MIN_ID};

/// Books module: CRUD routes over a [`BookStore`] supplied at construction.
pub struct BooksModule {
    store: SharedBookStore,
}

impl BooksModule {
    pub fn new(store: SharedBookStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_books",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id        BIGSERIAL PRIMARY KEY,
                    author    TEXT NOT NULL,
                    title     TEXT,
                    publisher TEXT NOT NULL
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create the books module over the given store
pub fn create_module(store: SharedBookStore) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn json_response(description: &str, schema: serde_json::Value) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": schema }
        }
    })
}

fn id_parameter() -> serde_json::Value {
    json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "description": "Numeric book identifier",
        "schema": { "type": "string" }
    }])
}

fn openapi_fragment() -> serde_json::Value {
    let book_ref = json!({ "$ref": "#/components/schemas/Book" });
    let book_envelope = json!({ "$ref": "#/components/schemas/BookEnvelope" });
    let books_envelope = json!({ "$ref": "#/components/schemas/BooksEnvelope" });

    json!({
        "paths": {
            "/create_books": {
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateBook" }
                            }
                        }
                    },
                    "responses": {
                        "201": json_response("Created book", book_ref),
                        "400": error_response("Storage error"),
                        "422": error_response("Request body could not be parsed")
                    }
                }
            },
            "/delete_books/{id}": {
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": id_parameter(),
                    "responses": {
                        "200": json_response("Book deleted", json!({
                            "type": "object",
                            "properties": { "msg": { "type": "string" } },
                            "required": ["msg"]
                        })),
                        "400": error_response("Missing or invalid id, or storage error"),
                        "404": error_response("Book not found")
                    }
                }
            },
            "/get_books/{id}": {
                "get": {
                    "summary": "Get a book by id",
                    "tags": ["Books"],
                    "parameters": id_parameter(),
                    "responses": {
                        "200": json_response("Book", book_envelope.clone()),
                        "400": error_response("Missing or invalid id, or storage error"),
                        "404": error_response("Book not found")
                    }
                }
            },
            "/books": {
                "get": {
                    "summary": "List all books",
                    "tags": ["Books"],
                    "responses": {
                        "200": json_response("All books in insertion order", books_envelope.clone()),
                        "400": error_response("Storage error")
                    }
                }
            },
            "/update_title/{id}": {
                "patch": {
                    "summary": "Replace a book's title",
                    "tags": ["Books"],
                    "parameters": id_parameter(),
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/UpdateTitle" }
                            }
                        }
                    },
                    "responses": {
                        "200": json_response("Updated book", book_envelope),
                        "400": error_response("Missing or invalid id, unparsable body, or storage error"),
                        "404": error_response("Book not found")
                    }
                }
            },
            "/get_books_by_id": {
                "get": {
                    "summary": "List books with id greater than 5, highest id first",
                    "tags": ["Books"],
                    "responses": {
                        "200": json_response("Filtered books", books_envelope),
                        "400": error_response("Storage error")
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": {
                                "text/plain": { "schema": { "type": "string" } }
                            }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "author": { "type": "string" },
                        "title": { "type": ["string", "null"] },
                        "publisher": { "type": "string" }
                    },
                    "required": ["id", "author", "title", "publisher"]
                },
                "CreateBook": {
                    "type": "object",
                    "properties": {
                        "author": { "type": "string" },
                        "title": { "type": ["string", "null"] },
                        "publisher": { "type": "string" }
                    }
                },
                "UpdateTitle": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" }
                    }
                },
                "BookEnvelope": {
                    "type": "object",
                    "properties": {
                        "book": { "$ref": "#/components/schemas/Book" }
                    },
                    "required": ["book"]
                },
                "BooksEnvelope": {
                    "type": "object",
                    "properties": {
                        "books": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Book" }
                        }
                    },
                    "required": ["books"]
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_every_route() {
        let module = BooksModule::new(Arc::new(InMemoryBookStore::new()));
        let spec = module.openapi().unwrap();

        for (path, method) in [
            ("/create_books", "post"),
            ("/delete_books/{id}", "delete"),
            ("/get_books/{id}", "get"),
            ("/books", "get"),
            ("/update_title/{id}", "patch"),
            ("/get_books_by_id", "get"),
        ] {
            assert!(
                spec["paths"][path][method].is_object(),
                "missing {method} {path}"
            );
        }
    }

    #[test]
    fn migration_creates_books_table() {
        let module = BooksModule::new(Arc::new(InMemoryBookStore::new()));
        let migrations = module.migrations();
        assert_eq!(migrations.len(), 1);
        assert!(migrations[0].up.contains("CREATE TABLE IF NOT EXISTS books"));
    }
}
