//! Front/back extraction from Anki `.anki2` archives.
//!
//! An `.anki2` file is a SQLite database; note fields live in `notes.flds`
//! separated by the unit-separator control character. Only the first two
//! fields are taken, everything else (tags, extra fields) is ignored.

use std::io::Write;

use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Row};
use thiserror::Error;

const FIELD_SEPARATOR: char = '\u{1f}';

#[derive(Debug, Error)]
pub enum AnkiImportError {
    #[error("failed to stage upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("staging task failed: {0}")]
    Staging(#[from] tokio::task::JoinError),
    #[error("failed to read archive: {0}")]
    Sqlite(#[from] sqlx::Error),
}

/// Extracts `(front, back)` pairs from raw `.anki2` bytes.
///
/// SQLite can only open files, so the upload is staged to a temp file that
/// is removed on drop. Uploads run to 16 MiB, so the write happens on the
/// blocking pool rather than a runtime worker.
pub async fn extract_pairs(archive: &[u8]) -> Result<Vec<(String, String)>, AnkiImportError> {
    let bytes = archive.to_vec();
    let staged = tokio::task::spawn_blocking(move || -> std::io::Result<tempfile::NamedTempFile> {
        let mut staged = tempfile::NamedTempFile::new()?;
        staged.write_all(&bytes)?;
        staged.flush()?;
        Ok(staged)
    })
    .await??;

    let options = SqliteConnectOptions::new()
        .filename(staged.path())
        .read_only(true);
    let mut conn = options.connect().await?;

    let rows = sqlx::query(
        r#"
        SELECT "notes"."flds"
        FROM "cards"
        JOIN "notes" ON "cards"."nid" = "notes"."id"
        "#,
    )
    .fetch_all(&mut conn)
    .await?;

    let mut pairs = Vec::with_capacity(rows.len());
    for row in rows {
        let flds: String = row.get(0);
        let mut fields = flds.split(FIELD_SEPARATOR);
        if let (Some(front), Some(back)) = (fields.next(), fields.next()) {
            pairs.push((format_field(front), format_field(back)));
        }
    }

    Ok(pairs)
}

/// Anki notes carry literal `\n` sequences; render them as line breaks.
fn format_field(raw: &str) -> String {
    raw.replace("\\n", "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_field_rewrites_newlines() {
        assert_eq!(format_field("a\\nb"), "a<br>b");
        assert_eq!(format_field("plain"), "plain");
    }

    #[tokio::test]
    async fn test_extract_rejects_garbage() {
        let result = extract_pairs(b"definitely not a sqlite file").await;
        assert!(result.is_err());
    }
}
