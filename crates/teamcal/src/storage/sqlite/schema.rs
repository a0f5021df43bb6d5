//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Collections that have ever received a document
CREATE TABLE IF NOT EXISTS collections (
    name TEXT PRIMARY KEY
);

-- JSON documents, one row per (collection, id)
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    PRIMARY KEY (collection, id),
    FOREIGN KEY (collection) REFERENCES collections(name)
);

CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
"#;

pub const INSERT_COLLECTION: &str = r#"
INSERT OR IGNORE INTO collections (name)
VALUES (?1)
"#;

pub const SELECT_COLLECTION: &str = r#"
SELECT name
FROM collections
WHERE name = ?1
"#;

pub const INSERT_DOCUMENT: &str = r#"
INSERT INTO documents (collection, id, body)
VALUES (?1, ?2, ?3)
"#;

pub const UPDATE_DOCUMENT: &str = r#"
UPDATE documents
SET body = ?3
WHERE collection = ?1 AND id = ?2
"#;

pub const DELETE_DOCUMENT: &str = r#"
DELETE FROM documents
WHERE collection = ?1 AND id = ?2
"#;

pub const SELECT_DOCUMENTS_BY_COLLECTION: &str = r#"
SELECT body
FROM documents
WHERE collection = ?1
ORDER BY id
"#;
