use super::models::{Action, ActionEntry, ActionKind, Board, NewAction};
use super::schema::actions::{dsl, table};
use super::schema::boards;
use super::{now_as_useconds, Result};
use diesel::prelude::*;

/// Write an audit record for something that happened to a board.
pub fn record(
    conn: &mut SqliteConnection,
    board_id: Option<i32>,
    kind: ActionKind,
) -> Result<Action> {
    let new_action = NewAction {
        action: kind.code(),
        created_at_us: now_as_useconds(),
        board_id,
    };
    let action = diesel::insert_into(table)
        .values(&new_action)
        .returning(Action::as_returning())
        .get_result(conn)?;
    log::debug!("Recorded {} action on board {:?}", kind.label(), board_id);
    Ok(action)
}

/// Get the board's audit records, newest first.
pub fn for_board(conn: &mut SqliteConnection, board_id: i32) -> Result<Vec<Action>> {
    Ok(dsl::actions
        .select(Action::as_select())
        .filter(dsl::board_id.eq(board_id))
        .order((dsl::created_at_us.desc(), dsl::id.desc()))
        .load(conn)?)
}

/// Get the most recent audit records across all boards.
pub fn recent(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<ActionEntry>> {
    let rows = dsl::actions
        .left_join(boards::table)
        .select((Action::as_select(), Option::<Board>::as_select()))
        .order((dsl::created_at_us.desc(), dsl::id.desc()))
        .limit(limit)
        .load::<(Action, Option<Board>)>(conn)?;
    Ok(rows
        .into_iter()
        .map(|(action, board)| ActionEntry { action, board })
        .collect())
}
