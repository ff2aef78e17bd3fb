use crate::db::schema::{actions, boards, cities, countries, posts, subjects, topics, users};
use crate::markup::{render_markdown, truncate_chars};
use crate::{formatted_useconds, Error};
use diesel::prelude::*;
use regex::Regex;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use validator::Validate;

use once_cell::sync::Lazy;

// Letters, digits, and @/./+/-/_ only.
static RE_USERNAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.@+-]+$").unwrap());

/// How much of a post's message shows up in listings.
pub const POST_PREVIEW_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::db::schema::countries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Country {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable, Validate)]
#[diesel(table_name = countries)]
pub struct NewCountry<'a> {
    #[validate(length(min = 1, max = 30))]
    pub name: &'a str,
}

impl Display for Country {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::db::schema::cities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct City {
    pub id: i32,
    pub name: String,
    pub country_id: i32,
}

#[derive(Insertable, Validate)]
#[diesel(table_name = cities)]
pub struct NewCity<'a> {
    #[validate(length(min = 1, max = 30))]
    pub name: &'a str,
    pub country_id: i32,
}

impl Display for City {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::db::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_reporter: bool,
    pub is_reader: bool,
    pub city_id: i32,
    pub date_joined_us: i64,
    pub last_login_us: Option<i64>,
}

#[derive(Insertable, Validate)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    #[validate(length(min = 1, max = 150), regex(path = *RE_USERNAME))]
    pub username: &'a str,
    #[validate(email)]
    pub email: Option<&'a str>,
    pub is_reporter: bool,
    pub is_reader: bool,
    pub city_id: i32,
    pub date_joined_us: i64,
}

/// First and last names, checked before they're stored.
#[derive(AsChangeset, Validate)]
#[diesel(table_name = users)]
pub struct UserNames<'a> {
    #[validate(length(max = 150))]
    pub first_name: &'a str,
    #[validate(length(max = 150))]
    pub last_name: &'a str,
}

impl User {
    pub fn date_joined(&self) -> String {
        formatted_useconds(self.date_joined_us)
    }

    pub fn last_login(&self) -> String {
        match self.last_login_us {
            Some(stamp) => formatted_useconds(stamp),
            None => "never".to_string(),
        }
    }

    /// "First Last", or the username if they never told us their name.
    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    /// The role flags as a short label, like "reader+reporter".
    pub fn roles(&self) -> String {
        match (self.is_reader, self.is_reporter) {
            (true, true) => "reader+reporter".to_string(),
            (true, false) => "reader".to_string(),
            (false, true) => "reporter".to_string(),
            (false, false) => "-".to_string(),
        }
    }
}

impl Display for User {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.username)
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::db::schema::subjects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Subject {
    pub id: i32,
    pub name: String,
}

#[derive(Insertable, Validate)]
#[diesel(table_name = subjects)]
pub struct NewSubject<'a> {
    #[validate(length(min = 1, max = 50))]
    pub name: &'a str,
}

impl Display for Subject {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}--Name:{}", self.id, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::db::schema::boards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Board {
    pub id: i32,
    pub name: String,
    pub subject_id: i32,
    pub description: String,
    pub creator_id: i32,
    pub is_deleted: bool,
    pub created_at_us: i64,
}

#[derive(Insertable, Validate)]
#[diesel(table_name = boards)]
pub struct NewBoard<'a> {
    #[validate(length(min = 1, max = 30))]
    pub name: &'a str,
    pub subject_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub description: &'a str,
    pub creator_id: i32,
    pub created_at_us: i64,
}

/// The editable parts of a board.
#[derive(AsChangeset, Validate)]
#[diesel(table_name = boards)]
pub struct BoardEdit<'a> {
    #[validate(length(min = 1, max = 30))]
    pub name: &'a str,
    #[validate(length(min = 1, max = 100))]
    pub description: &'a str,
}

impl Board {
    pub fn created_at(&self) -> String {
        formatted_useconds(self.created_at_us)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name)
    }
}

/// The reader profile row. Its key is the user's own ID.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::db::schema::readers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Reader {
    pub user_id: i32,
}

/// A reader along with the account and subjects that go with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderProfile {
    pub reader: Reader,
    pub user: User,
    pub interests: Vec<Subject>,
}

impl Display for ReaderProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.user.username)
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::db::schema::topics)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Topic {
    pub id: i32,
    pub subject: String,
    pub last_updated_us: i64,
    pub board_id: i32,
    pub starter_id: i32,
    pub views: i32,
}

#[derive(Insertable, Validate)]
#[diesel(table_name = topics)]
pub struct NewTopic<'a> {
    #[validate(length(min = 1, max = 255))]
    pub subject: &'a str,
    pub last_updated_us: i64,
    pub board_id: i32,
    pub starter_id: i32,
    pub views: i32,
}

/// A new subject for a topic. Renaming counts as an update.
#[derive(AsChangeset, Validate)]
#[diesel(table_name = topics)]
pub struct TopicRename<'a> {
    #[validate(length(min = 1, max = 255))]
    pub subject: &'a str,
    pub last_updated_us: i64,
}

impl Topic {
    pub fn last_updated(&self) -> String {
        formatted_useconds(self.last_updated_us)
    }
}

impl Display for Topic {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.subject)
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::db::schema::posts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Post {
    pub id: i32,
    pub message: String,
    pub topic_id: i32,
    pub created_at_us: i64,
    pub updated_at_us: Option<i64>,
    pub created_by_id: i32,
    pub updated_by_id: Option<i32>,
}

#[derive(Insertable, Validate)]
#[diesel(table_name = posts)]
pub struct NewPost<'a> {
    #[validate(length(min = 1, max = 4000))]
    pub message: &'a str,
    pub topic_id: i32,
    pub created_at_us: i64,
    pub created_by_id: i32,
}

/// A new message for an existing post, and who wrote it.
#[derive(AsChangeset, Validate)]
#[diesel(table_name = posts)]
pub struct PostEdit<'a> {
    #[validate(length(min = 1, max = 4000))]
    pub message: &'a str,
    pub updated_at_us: Option<i64>,
    pub updated_by_id: Option<i32>,
}

impl Post {
    pub fn created_at(&self) -> String {
        formatted_useconds(self.created_at_us)
    }

    pub fn updated_at(&self) -> Option<String> {
        self.updated_at_us.map(formatted_useconds)
    }

    /// The message rendered as HTML, with any raw HTML in it escaped.
    pub fn message_as_markdown(&self) -> String {
        render_markdown(&self.message)
    }
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", truncate_chars(&self.message, POST_PREVIEW_CHARS))
    }
}

/// Board-level events worth auditing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Add,
    Delete,
    Edit,
}

impl ActionKind {
    /// The short code stored in the database.
    pub fn code(self) -> &'static str {
        match self {
            ActionKind::Add => "add",
            ActionKind::Delete => "del",
            ActionKind::Edit => "edt",
        }
    }

    /// The human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Add => "create",
            ActionKind::Delete => "delete",
            ActionKind::Edit => "edit",
        }
    }
}

impl FromStr for ActionKind {
    type Err = Error;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "add" => Ok(ActionKind::Add),
            "del" => Ok(ActionKind::Delete),
            "edt" => Ok(ActionKind::Edit),
            other => Err(Error::UnknownAction(other.to_string())),
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = crate::db::schema::actions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Action {
    pub id: i32,
    pub action: String,
    pub created_at_us: i64,
    pub board_id: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = actions)]
pub struct NewAction<'a> {
    pub action: &'a str,
    pub created_at_us: i64,
    pub board_id: Option<i32>,
}

impl Action {
    pub fn kind(&self) -> Result<ActionKind, Error> {
        self.action.parse()
    }

    pub fn created_at(&self) -> String {
        formatted_useconds(self.created_at_us)
    }
}

/// An audit record with the board it happened to, if that board still exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEntry {
    pub action: Action,
    pub board: Option<Board>,
}

impl Display for ActionEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let board_name = self.board.as_ref().map_or("", |board| board.name.as_str());
        write!(f, "{}-{}", board_name, self.action.action)
    }
}
