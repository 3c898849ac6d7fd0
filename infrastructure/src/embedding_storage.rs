use domain::models::Embedding;
use rusqlite::{params, Connection, OptionalExtension, Result as SqlResult};
use shared::types::Result;
use std::path::Path;

const EMBEDDING_MODEL_KEY: &str = "embedding_model";

/// Persistent vector store for framework chunks.
pub struct EmbeddingStorage {
    conn: Connection,
}

impl EmbeddingStorage {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        Self::setup_db(&conn)?;
        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::setup_db(&conn)?;
        Ok(Self { conn })
    }

    fn setup_db(conn: &Connection) -> SqlResult<()> {
        conn.execute_batch(
            "
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            PRAGMA temp_store=MEMORY;
            CREATE TABLE IF NOT EXISTS embeddings (
                id TEXT PRIMARY KEY,
                vector BLOB NOT NULL,
                text TEXT NOT NULL,
                path TEXT NOT NULL DEFAULT ''
            );
            CREATE INDEX IF NOT EXISTS idx_embeddings_path ON embeddings(path);
            CREATE TABLE IF NOT EXISTS file_meta (
                path TEXT PRIMARY KEY,
                hash TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS store_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
        ",
        )
    }

    pub fn insert_embeddings(&self, embeddings: &[Embedding]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT OR REPLACE INTO embeddings (id, vector, text, path) VALUES (?, ?, ?, ?)",
            )?;
            for embedding in embeddings {
                let vector_bytes = serde_json::to_vec(&embedding.vector)?;
                stmt.execute(params![
                    embedding.id,
                    vector_bytes,
                    embedding.text,
                    embedding.path
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_all_embeddings(&self) -> Result<Vec<Embedding>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, vector, text, path FROM embeddings ORDER BY id")?;
        let mut rows = stmt.query([])?;
        let mut embeddings = Vec::new();
        while let Some(row) = rows.next()? {
            let vector_bytes: Vec<u8> = row.get(1)?;
            embeddings.push(Embedding {
                id: row.get(0)?,
                vector: serde_json::from_slice(&vector_bytes)?,
                text: row.get(2)?,
                path: row.get(3)?,
            });
        }
        Ok(embeddings)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM embeddings", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn get_file_hash(&self, path: &str) -> Result<Option<String>> {
        let hash = self
            .conn
            .query_row(
                "SELECT hash FROM file_meta WHERE path = ?1",
                [path],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hash)
    }

    pub fn upsert_file_hash(&self, path: &str, hash: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO file_meta (path, hash) VALUES (?1, ?2)",
            params![path, hash],
        )?;
        Ok(())
    }

    /// Every document path that has a recorded hash.
    pub fn indexed_paths(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT path FROM file_meta ORDER BY path")?;
        let paths = stmt
            .query_map([], |row| row.get(0))?
            .collect::<SqlResult<Vec<String>>>()?;
        Ok(paths)
    }

    pub fn delete_embeddings_for_path(&self, path: &str) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM embeddings WHERE path = ?1", params![path])?;
        Ok(deleted)
    }

    /// Drop a document entirely: its chunks and its recorded hash.
    pub fn remove_path(&self, path: &str) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let deleted = tx.execute("DELETE FROM embeddings WHERE path = ?1", params![path])?;
        tx.execute("DELETE FROM file_meta WHERE path = ?1", params![path])?;
        tx.commit()?;
        Ok(deleted)
    }

    pub fn clear(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            DELETE FROM embeddings;
            DELETE FROM file_meta;
            DELETE FROM store_meta;
        ",
        )?;
        Ok(())
    }

    pub fn embedding_model(&self) -> Result<Option<String>> {
        let model = self
            .conn
            .query_row(
                "SELECT value FROM store_meta WHERE key = ?1",
                [EMBEDDING_MODEL_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(model)
    }

    pub fn set_embedding_model(&self, model: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO store_meta (key, value) VALUES (?1, ?2)",
            params![EMBEDDING_MODEL_KEY, model],
        )?;
        Ok(())
    }
}
