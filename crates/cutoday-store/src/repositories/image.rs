//! Uploaded event flyers.

use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// An uploaded image, optionally tied to an organization and a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub id: i64,
    pub url: String,
    pub organization: Option<String>,
    pub date: Option<String>,
}

/// Fields for a new image.
#[derive(Debug, Clone, Default)]
pub struct NewImage {
    pub url: String,
    pub organization: Option<String>,
    pub date: Option<String>,
}

pub struct ImageRepo;

impl ImageRepo {
    /// Inserts an image and returns its id.
    pub fn add(conn: &Connection, image: &NewImage) -> StoreResult<i64> {
        conn.execute(
            "INSERT INTO images (url, organization, date) VALUES (?1, ?2, ?3)",
            params![image.url, image.organization, image.date],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Lists images, newest upload first.
    pub fn list(conn: &Connection) -> StoreResult<Vec<ImageRecord>> {
        let mut stmt = conn.prepare("SELECT id, url, organization, date FROM images ORDER BY id DESC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(ImageRecord {
                    id: row.get(0)?,
                    url: row.get(1)?,
                    organization: row.get(2)?,
                    date: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
