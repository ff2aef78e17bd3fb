use super::models::{NewSubject, Subject};
use super::schema::subjects::{dsl, table};
use super::Result;
use diesel::prelude::*;
use validator::Validate as _;

pub fn add(conn: &mut SqliteConnection, name: &str) -> Result<Subject> {
    let new_subject = NewSubject { name: name.trim() };
    new_subject.validate()?;

    let subject = diesel::insert_into(table)
        .values(&new_subject)
        .returning(Subject::as_returning())
        .get_result(conn)?;
    log::info!("Added subject {subject}");
    Ok(subject)
}

pub fn all(conn: &mut SqliteConnection) -> Result<Vec<Subject>> {
    Ok(dsl::subjects
        .select(Subject::as_select())
        .order(dsl::name)
        .load(conn)?)
}

pub fn get(conn: &mut SqliteConnection, subject_id: i32) -> Result<Subject> {
    Ok(dsl::subjects
        .select(Subject::as_select())
        .filter(dsl::id.eq(subject_id))
        .first(conn)?)
}

/// Delete a subject. Its boards go with it, and readers lose it as an interest.
pub fn delete(conn: &mut SqliteConnection, subject_id: i32) -> Result<usize> {
    let deleted = diesel::delete(dsl::subjects.filter(dsl::id.eq(subject_id))).execute(conn)?;
    if deleted > 0 {
        log::info!("Deleted subject #{subject_id}");
    }
    Ok(deleted)
}
