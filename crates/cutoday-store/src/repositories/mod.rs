//! Stateless repositories; every method takes a `&Connection`.

mod image;
mod opportunity;
mod organization;

pub use image::{ImageRecord, ImageRepo, NewImage};
pub use opportunity::OpportunityRepo;
pub use organization::{NewOrganization, Organization, OrganizationRepo};

#[cfg(test)]
pub(crate) fn test_connection() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    crate::schema::apply(&conn).unwrap();
    conn
}
