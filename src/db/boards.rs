use super::models::{ActionKind, Board, BoardEdit, NewBoard, Post};
use super::schema::boards::{dsl, table};
use super::schema::{posts, topics};
use super::{actions, now_as_useconds, Result};
use crate::Error;
use diesel::prelude::*;
use validator::Validate as _;

/// Create a board and log its creation.
pub fn add(
    conn: &mut SqliteConnection,
    name: &str,
    subject_id: i32,
    description: &str,
    creator_id: i32,
) -> Result<Board> {
    let new_board = NewBoard {
        name: name.trim(),
        subject_id,
        description: description.trim(),
        creator_id,
        created_at_us: now_as_useconds(),
    };
    new_board.validate()?;

    let board = conn.transaction::<_, Error, _>(|conn| {
        let board = diesel::insert_into(table)
            .values(&new_board)
            .returning(Board::as_returning())
            .get_result(conn)?;
        actions::record(conn, Some(board.id), ActionKind::Add)?;
        Ok(board)
    })?;
    log::info!("Added board #{}, '{}'", board.id, board.name);
    Ok(board)
}

/// Change a board's name and description, and log the edit.
pub fn edit(
    conn: &mut SqliteConnection,
    board_id: i32,
    name: &str,
    description: &str,
) -> Result<Board> {
    let changes = BoardEdit {
        name: name.trim(),
        description: description.trim(),
    };
    changes.validate()?;

    let board = conn.transaction::<_, Error, _>(|conn| {
        let board = diesel::update(dsl::boards.filter(dsl::id.eq(board_id)))
            .set(&changes)
            .returning(Board::as_returning())
            .get_result(conn)?;
        actions::record(conn, Some(board.id), ActionKind::Edit)?;
        Ok(board)
    })?;
    log::info!("Edited board #{}, '{}'", board.id, board.name);
    Ok(board)
}

/// Flag a board as deleted and log it. Its topics and posts stay put.
///
/// The flag only hides the board from `active`. Nothing stops further writes to it.
pub fn soft_delete(conn: &mut SqliteConnection, board_id: i32) -> Result<Board> {
    let board = conn.transaction::<_, Error, _>(|conn| {
        let board = diesel::update(dsl::boards.filter(dsl::id.eq(board_id)))
            .set(dsl::is_deleted.eq(true))
            .returning(Board::as_returning())
            .get_result(conn)?;
        actions::record(conn, Some(board.id), ActionKind::Delete)?;
        Ok(board)
    })?;
    log::info!("Flagged board #{} as deleted", board.id);
    Ok(board)
}

/// Really delete a board. Its topics, posts, and audit records go with it.
pub fn purge(conn: &mut SqliteConnection, board_id: i32) -> Result<usize> {
    let deleted = diesel::delete(dsl::boards.filter(dsl::id.eq(board_id))).execute(conn)?;
    if deleted > 0 {
        log::info!("Purged board #{board_id}");
    }
    Ok(deleted)
}

/// Every board, deleted or not.
pub fn all(conn: &mut SqliteConnection) -> Result<Vec<Board>> {
    Ok(dsl::boards
        .select(Board::as_select())
        .order(dsl::id)
        .load(conn)?)
}

/// Boards that haven't been flagged as deleted.
pub fn active(conn: &mut SqliteConnection) -> Result<Vec<Board>> {
    Ok(dsl::boards
        .select(Board::as_select())
        .filter(dsl::is_deleted.eq(false))
        .order(dsl::id)
        .load(conn)?)
}

pub fn for_subject(conn: &mut SqliteConnection, subject_id: i32) -> Result<Vec<Board>> {
    Ok(dsl::boards
        .select(Board::as_select())
        .filter(dsl::subject_id.eq(subject_id))
        .filter(dsl::is_deleted.eq(false))
        .order(dsl::id)
        .load(conn)?)
}

pub fn get(conn: &mut SqliteConnection, board_id: i32) -> Result<Board> {
    Ok(dsl::boards
        .select(Board::as_select())
        .filter(dsl::id.eq(board_id))
        .first(conn)?)
}

/// Get the number of posts in all of the board's topics.
pub fn posts_count(conn: &mut SqliteConnection, board_id: i32) -> Result<i64> {
    Ok(posts::table
        .inner_join(topics::table)
        .filter(topics::board_id.eq(board_id))
        .count()
        .get_result(conn)?)
}

/// Get the number of topics in the board.
pub fn topics_count(conn: &mut SqliteConnection, board_id: i32) -> Result<i64> {
    Ok(topics::table
        .filter(topics::board_id.eq(board_id))
        .count()
        .get_result(conn)?)
}

/// Get the newest post in any of the board's topics.
pub fn last_post(conn: &mut SqliteConnection, board_id: i32) -> Result<Option<Post>> {
    Ok(posts::table
        .inner_join(topics::table)
        .filter(topics::board_id.eq(board_id))
        .select(Post::as_select())
        .order((posts::created_at_us.desc(), posts::id.desc()))
        .first(conn)
        .optional()?)
}
