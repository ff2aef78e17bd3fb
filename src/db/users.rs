use super::models::{NewUser, User, UserNames};
use super::schema::users::{dsl, table};
use super::{now_as_useconds, Result};
use diesel::prelude::*;
use validator::Validate as _;

/// Create an account in a city with the given roles.
pub fn add(
    conn: &mut SqliteConnection,
    username: &str,
    email: Option<&str>,
    city_id: i32,
    is_reporter: bool,
    is_reader: bool,
) -> Result<User> {
    let new_user = NewUser {
        username: username.trim(),
        email: email.map(str::trim).filter(|email| !email.is_empty()),
        is_reporter,
        is_reader,
        city_id,
        date_joined_us: now_as_useconds(),
    };
    new_user.validate()?;

    let user = diesel::insert_into(table)
        .values(&new_user)
        .returning(User::as_returning())
        .get_result(conn)?;
    log::info!("Added user #{}, '{}'", user.id, user.username);
    Ok(user)
}

pub fn all(conn: &mut SqliteConnection) -> Result<Vec<User>> {
    Ok(dsl::users
        .select(User::as_select())
        .order(dsl::date_joined_us)
        .load(conn)?)
}

pub fn get(conn: &mut SqliteConnection, user_id: i32) -> Result<User> {
    Ok(dsl::users
        .select(User::as_select())
        .filter(dsl::id.eq(user_id))
        .first(conn)?)
}

/// Look someone up by their username.
pub fn find(conn: &mut SqliteConnection, username: &str) -> Result<User> {
    log::debug!("Looking up user '{username}'");
    Ok(dsl::users
        .select(User::as_select())
        .filter(dsl::username.eq(username.trim()))
        .first(conn)?)
}

/// Everyone allowed to start boards and write.
pub fn reporters(conn: &mut SqliteConnection) -> Result<Vec<User>> {
    Ok(dsl::users
        .select(User::as_select())
        .filter(dsl::is_reporter.eq(true))
        .order(dsl::username)
        .load(conn)?)
}

/// Everyone flagged as a reader.
pub fn readers(conn: &mut SqliteConnection) -> Result<Vec<User>> {
    Ok(dsl::users
        .select(User::as_select())
        .filter(dsl::is_reader.eq(true))
        .order(dsl::username)
        .load(conn)?)
}

pub fn set_roles(
    conn: &mut SqliteConnection,
    user_id: i32,
    is_reporter: bool,
    is_reader: bool,
) -> Result<User> {
    let user = diesel::update(dsl::users.filter(dsl::id.eq(user_id)))
        .set((dsl::is_reporter.eq(is_reporter), dsl::is_reader.eq(is_reader)))
        .returning(User::as_returning())
        .get_result(conn)?;
    log::info!("Set roles of '{}' to {}", user.username, user.roles());
    Ok(user)
}

pub fn set_names(
    conn: &mut SqliteConnection,
    user_id: i32,
    first_name: &str,
    last_name: &str,
) -> Result<User> {
    let names = UserNames {
        first_name: first_name.trim(),
        last_name: last_name.trim(),
    };
    names.validate()?;

    let user = diesel::update(dsl::users.filter(dsl::id.eq(user_id)))
        .set(&names)
        .returning(User::as_returning())
        .get_result(conn)?;
    log::info!("Renamed user '{}'", user.username);
    Ok(user)
}

/// Stamp the user's last login time.
pub fn login(conn: &mut SqliteConnection, user_id: i32) -> Result<User> {
    let user = diesel::update(dsl::users.filter(dsl::id.eq(user_id)))
        .set(dsl::last_login_us.eq(now_as_useconds()))
        .returning(User::as_returning())
        .get_result(conn)?;
    log::info!("User '{}' logged in", user.username);
    Ok(user)
}

/// Disable an account without deleting anything they wrote.
pub fn deactivate(conn: &mut SqliteConnection, user_id: i32) -> Result<User> {
    let user = diesel::update(dsl::users.filter(dsl::id.eq(user_id)))
        .set(dsl::is_active.eq(false))
        .returning(User::as_returning())
        .get_result(conn)?;
    log::info!("Deactivated user '{}'", user.username);
    Ok(user)
}

/// Delete an account. Their boards, topics, and posts go with it.
pub fn delete(conn: &mut SqliteConnection, user_id: i32) -> Result<usize> {
    let deleted = diesel::delete(dsl::users.filter(dsl::id.eq(user_id))).execute(conn)?;
    if deleted > 0 {
        log::info!("Deleted user #{user_id}");
    }
    Ok(deleted)
}
