//! The `organizations` table.

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// A participating organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub link: Option<String>,
}

/// Fields for a new organization.
#[derive(Debug, Clone, Default)]
pub struct NewOrganization {
    pub name: String,
    pub link: Option<String>,
}

pub struct OrganizationRepo;

impl OrganizationRepo {
    /// Inserts an organization and returns its id.
    pub fn create(conn: &Connection, org: &NewOrganization) -> StoreResult<i64> {
        conn.execute(
            "INSERT INTO organizations (name, link) VALUES (?1, ?2)",
            params![org.name, org.link],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Lists organizations ordered by name.
    pub fn list(conn: &Connection) -> StoreResult<Vec<Organization>> {
        let mut stmt = conn.prepare("SELECT id, name, link FROM organizations ORDER BY name, id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Organization {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    link: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn exists(conn: &Connection, id: i64) -> StoreResult<bool> {
        let found = conn
            .query_row("SELECT 1 FROM organizations WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_connection;

    fn org(name: &str, link: Option<&str>) -> NewOrganization {
        NewOrganization {
            name: name.to_string(),
            link: link.map(String::from),
        }
    }

    #[test]
    fn create_and_list_ordered_by_name() {
        let conn = test_connection();
        let b = OrganizationRepo::create(&conn, &org("Utah Votes", Some("https://utahvotes.org"))).unwrap();
        let a = OrganizationRepo::create(&conn, &org("Alliance for a Better Utah", None)).unwrap();
        assert_ne!(a, b);

        let orgs = OrganizationRepo::list(&conn).unwrap();
        let names: Vec<_> = orgs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Alliance for a Better Utah", "Utah Votes"]);
        assert_eq!(orgs[0].link, None);
        assert_eq!(orgs[1].link.as_deref(), Some("https://utahvotes.org"));
    }

    #[test]
    fn names_are_stored_verbatim() {
        let conn = test_connection();
        let name = "Robert'); DROP TABLE organizations;--";
        OrganizationRepo::create(&conn, &org(name, None)).unwrap();
        assert_eq!(OrganizationRepo::list(&conn).unwrap()[0].name, name);
    }

    #[test]
    fn exists() {
        let conn = test_connection();
        let id = OrganizationRepo::create(&conn, &org("A", None)).unwrap();
        assert!(OrganizationRepo::exists(&conn, id).unwrap());
        assert!(!OrganizationRepo::exists(&conn, id + 1).unwrap());
    }
}
