use super::models::{Board, Reader, ReaderProfile, Subject, User};
use super::schema::readers::{dsl, table};
use super::schema::{boards, reader_interests, subjects, users};
use super::Result;
use crate::Error;
use diesel::prelude::*;

/// Make a user a reader with these interests.
///
/// Sets their `is_reader` flag and creates the reader profile in one go. Enrolling someone who's
/// already a reader just adds the new interests.
pub fn enroll(
    conn: &mut SqliteConnection,
    user_id: i32,
    subject_ids: &[i32],
) -> Result<ReaderProfile> {
    let profile = conn.transaction::<_, Error, _>(|conn| {
        diesel::update(users::table.filter(users::id.eq(user_id)))
            .set(users::is_reader.eq(true))
            .execute(conn)?;
        diesel::insert_or_ignore_into(table)
            .values(dsl::user_id.eq(user_id))
            .execute(conn)?;
        for subject_id in subject_ids {
            add_interest(conn, user_id, *subject_id)?;
        }
        get(conn, user_id)
    })?;
    log::info!(
        "Enrolled reader '{}' with {} interests",
        profile,
        profile.interests.len()
    );
    Ok(profile)
}

/// Get the reader, their account, and their interests.
pub fn get(conn: &mut SqliteConnection, user_id: i32) -> Result<ReaderProfile> {
    let (reader, user) = dsl::readers
        .inner_join(users::table)
        .select((Reader::as_select(), User::as_select()))
        .filter(dsl::user_id.eq(user_id))
        .first::<(Reader, User)>(conn)?;
    let interests = interests(conn, user_id)?;
    Ok(ReaderProfile {
        reader,
        user,
        interests,
    })
}

pub fn all(conn: &mut SqliteConnection) -> Result<Vec<ReaderProfile>> {
    let ids: Vec<i32> = dsl::readers
        .select(dsl::user_id)
        .order(dsl::user_id)
        .load(conn)?;
    ids.into_iter().map(|user_id| get(conn, user_id)).collect()
}

/// The subjects this reader follows, by name.
pub fn interests(conn: &mut SqliteConnection, user_id: i32) -> Result<Vec<Subject>> {
    Ok(subjects::table
        .inner_join(reader_interests::table)
        .filter(reader_interests::reader_id.eq(user_id))
        .select(Subject::as_select())
        .order(subjects::name)
        .load(conn)?)
}

/// Follow a subject. Following one twice is a no-op.
pub fn add_interest(conn: &mut SqliteConnection, user_id: i32, subject_id: i32) -> Result<()> {
    diesel::insert_or_ignore_into(reader_interests::table)
        .values((
            reader_interests::reader_id.eq(user_id),
            reader_interests::subject_id.eq(subject_id),
        ))
        .execute(conn)?;
    log::info!("Reader #{user_id} follows subject #{subject_id}");
    Ok(())
}

pub fn remove_interest(conn: &mut SqliteConnection, user_id: i32, subject_id: i32) -> Result<()> {
    diesel::delete(
        reader_interests::table
            .filter(reader_interests::reader_id.eq(user_id))
            .filter(reader_interests::subject_id.eq(subject_id)),
    )
    .execute(conn)?;
    log::info!("Reader #{user_id} dropped subject #{subject_id}");
    Ok(())
}

/// Replace the reader's interests with exactly these subjects.
pub fn set_interests(
    conn: &mut SqliteConnection,
    user_id: i32,
    subject_ids: &[i32],
) -> Result<Vec<Subject>> {
    let subjects = conn.transaction::<_, Error, _>(|conn| {
        diesel::delete(reader_interests::table.filter(reader_interests::reader_id.eq(user_id)))
            .execute(conn)?;
        for subject_id in subject_ids {
            add_interest(conn, user_id, *subject_id)?;
        }
        interests(conn, user_id)
    })?;
    log::info!("Reader #{user_id} now follows {} subjects", subjects.len());
    Ok(subjects)
}

/// Boards about the things this reader cares about, skipping deleted ones.
pub fn recommended_boards(conn: &mut SqliteConnection, user_id: i32) -> Result<Vec<Board>> {
    let followed = reader_interests::table
        .filter(reader_interests::reader_id.eq(user_id))
        .select(reader_interests::subject_id);
    Ok(boards::table
        .select(Board::as_select())
        .filter(boards::subject_id.eq_any(followed))
        .filter(boards::is_deleted.eq(false))
        .order(boards::id)
        .load(conn)?)
}
