//! Volunteer openings per organization.

use rusqlite::{Connection, params};

use crate::error::{StoreError, StoreResult};
use crate::repositories::OrganizationRepo;

pub struct OpportunityRepo;

impl OpportunityRepo {
    /// Adds an opportunity to an existing organization.
    pub fn add(conn: &Connection, organization_id: i64, opportunity: &str) -> StoreResult<()> {
        if !OrganizationRepo::exists(conn, organization_id)? {
            return Err(StoreError::NotFound(format!("organization {}", organization_id)));
        }
        conn.execute(
            "INSERT INTO opportunities (organization_id, opportunity) VALUES (?1, ?2)",
            params![organization_id, opportunity],
        )?;
        Ok(())
    }

    /// Lists an organization's opportunities in insertion order.
    pub fn list_for(conn: &Connection, organization_id: i64) -> StoreResult<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT opportunity FROM opportunities WHERE organization_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![organization_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{NewOrganization, test_connection};

    #[test]
    fn add_and_list() {
        let conn = test_connection();
        let id = OrganizationRepo::create(
            &conn,
            &NewOrganization {
                name: "Utah Votes".to_string(),
                link: None,
            },
        )
        .unwrap();

        OpportunityRepo::add(&conn, id, "Phone bank captain").unwrap();
        OpportunityRepo::add(&conn, id, "Voter registration").unwrap();

        assert_eq!(
            OpportunityRepo::list_for(&conn, id).unwrap(),
            vec!["Phone bank captain", "Voter registration"]
        );
        assert!(OpportunityRepo::list_for(&conn, id + 1).unwrap().is_empty());
    }

    #[test]
    fn unknown_organization_is_not_found() {
        let conn = test_connection();
        let err = OpportunityRepo::add(&conn, 42, "Anything").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
