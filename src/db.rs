pub mod actions;
pub mod boards;
pub mod cities;
pub mod countries;
pub mod posts;
pub mod readers;
pub mod subjects;
pub mod topics;
pub mod users;
use chrono::Utc;
pub use models::{
    Action, ActionEntry, ActionKind, Board, City, Country, Post, Reader, ReaderProfile, Subject,
    Topic, User,
};
mod models;
mod schema;
use crate::{BlogConfig, Error};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::fmt::{Display, Formatter, Result as FmtResult};

pub type Result<T> = std::result::Result<T, Error>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Open the configured database and bring its schema up to date.
pub fn establish_connection(cfg: &BlogConfig) -> Result<SqliteConnection> {
    let database_url = &cfg.db_path;
    if let Some(parent) = std::path::Path::new(database_url).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            log::info!("Creating {}", parent.display());
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut connection =
        SqliteConnection::establish(database_url).map_err(|source| Error::Connection {
            path: database_url.clone(),
            source,
        })?;
    prepare(&mut connection)?;
    log::debug!("Connected to {database_url}");
    Ok(connection)
}

/// Turn on foreign key enforcement and run any pending migrations.
///
/// SQLite leaves foreign keys off per connection, and cascading deletes depend on them.
fn prepare(connection: &mut SqliteConnection) -> Result<()> {
    connection.batch_execute("PRAGMA foreign_keys = ON")?;
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| Error::Migration(err.to_string()))?;
    for version in applied {
        log::info!("Applied migration {version}");
    }
    Ok(())
}

/// Get the number of microseconds since the Unix epoch.
pub fn now_as_useconds() -> i64 {
    Utc::now().timestamp_micros()
}

/// Row counts of every table, for a quick look at the state of the site.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub countries: i64,
    pub cities: i64,
    pub users: i64,
    pub readers: i64,
    pub subjects: i64,
    pub boards: i64,
    pub deleted_boards: i64,
    pub topics: i64,
    pub posts: i64,
    pub actions: i64,
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "Countries: {}", self.countries)?;
        writeln!(f, "Cities: {}", self.cities)?;
        writeln!(f, "Users: {} ({} readers)", self.users, self.readers)?;
        writeln!(f, "Subjects: {}", self.subjects)?;
        writeln!(
            f,
            "Boards: {} ({} deleted)",
            self.boards, self.deleted_boards
        )?;
        writeln!(f, "Topics: {}", self.topics)?;
        writeln!(f, "Posts: {}", self.posts)?;
        write!(f, "Actions: {}", self.actions)
    }
}

pub fn stats(conn: &mut SqliteConnection) -> Result<Stats> {
    use schema::{actions, boards, cities, countries, posts, readers, subjects, topics, users};

    Ok(Stats {
        countries: countries::table.count().get_result(conn)?,
        cities: cities::table.count().get_result(conn)?,
        users: users::table.count().get_result(conn)?,
        readers: readers::table.count().get_result(conn)?,
        subjects: subjects::table.count().get_result(conn)?,
        boards: boards::table.count().get_result(conn)?,
        deleted_boards: boards::table
            .filter(boards::is_deleted.eq(true))
            .count()
            .get_result(conn)?,
        topics: topics::table.count().get_result(conn)?,
        posts: posts::table.count().get_result(conn)?,
        actions: actions::table.count().get_result(conn)?,
    })
}

/// A fresh, fully migrated in-memory database.
#[cfg(test)]
pub fn test_connection() -> SqliteConnection {
    let mut connection =
        SqliteConnection::establish(":memory:").expect("should open an in-memory database");
    prepare(&mut connection).expect("should migrate the in-memory database");
    connection
}

/// A country, city, and user to hang test fixtures off of.
#[cfg(test)]
pub fn test_user(conn: &mut SqliteConnection, username: &str) -> User {
    let country = countries::add(conn, "Testland").expect("should create country");
    let city = cities::add(conn, "Testville", country.id).expect("should create city");
    users::add(conn, username, None, city.id, false, false).expect("should create user")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_database_has_no_rows() {
        let mut conn = test_connection();
        assert_eq!(stats(&mut conn).expect("stats"), Stats::default());
    }

    #[test]
    fn unusable_database_directory_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").expect("write blocker");
        let cfg = BlogConfig {
            db_path: blocker.join("data").join("blog.db").to_string_lossy().into_owned(),
            log_level: "info".into(),
        };
        let err = establish_connection(&cfg).err().expect("parent is a file");
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn creates_missing_database_directories() {
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("nested").join("blog.db");
        let cfg = BlogConfig {
            db_path: db_path.to_string_lossy().into_owned(),
            log_level: "info".into(),
        };
        let mut conn = establish_connection(&cfg).expect("connect");
        assert_eq!(stats(&mut conn).expect("stats"), Stats::default());
        assert!(db_path.exists());
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let mut conn = test_connection();
        let err = cities::add(&mut conn, "Nowhere", 999).expect_err("no such country");
        assert!(matches!(err, Error::Database(_)));
    }

    #[test]
    fn stats_count_everything() {
        let mut conn = test_connection();
        let user = test_user(&mut conn, "counter");
        let subject = subjects::add(&mut conn, "Science").expect("subject");
        let board = boards::add(&mut conn, "Physics", subject.id, "Things that fall", user.id)
            .expect("board");
        topics::start(&mut conn, board.id, user.id, "Gravity", "It works").expect("topic");

        let stats = stats(&mut conn).expect("stats");
        assert_eq!(stats.users, 1);
        assert_eq!(stats.boards, 1);
        assert_eq!(stats.topics, 1);
        assert_eq!(stats.posts, 1);
        assert_eq!(stats.actions, 1);
        assert!(format!("{stats}").contains("Posts: 1"));
    }
}
