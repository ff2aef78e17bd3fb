use super::models::{NewPost, NewTopic, Post, Topic, TopicRename, User};
use super::schema::topics::{dsl, table};
use super::schema::{posts, users};
use super::{now_as_useconds, Result};
use crate::paginate::{self, POSTS_PER_PAGE};
use crate::Error;
use diesel::prelude::*;
use std::ops::Range;
use validator::Validate as _;

/// How many posts `last_ten_posts` returns.
const RECENT_POSTS: i64 = 10;

/// Start a new topic in a board with its opening post.
pub fn start(
    conn: &mut SqliteConnection,
    board_id: i32,
    starter_id: i32,
    subject: &str,
    message: &str,
) -> Result<(Topic, Post)> {
    let now = now_as_useconds();
    let message = message.trim();
    let new_topic = NewTopic {
        subject: subject.trim(),
        last_updated_us: now,
        board_id,
        starter_id,
        views: 1,
    };
    new_topic.validate()?;
    // Check the opening post up front, too, so a bad one doesn't leave an empty topic behind.
    NewPost {
        message,
        topic_id: 0,
        created_at_us: now,
        created_by_id: starter_id,
    }
    .validate()?;

    let (topic, post) = conn.transaction::<_, Error, _>(|conn| {
        let topic = diesel::insert_into(table)
            .values(&new_topic)
            .returning(Topic::as_returning())
            .get_result(conn)?;
        let post = diesel::insert_into(posts::table)
            .values(&NewPost {
                message,
                topic_id: topic.id,
                created_at_us: now,
                created_by_id: starter_id,
            })
            .returning(Post::as_returning())
            .get_result(conn)?;
        Ok((topic, post))
    })?;
    log::info!("Started topic #{}, '{}'", topic.id, topic.subject);
    Ok((topic, post))
}

pub fn get(conn: &mut SqliteConnection, topic_id: i32) -> Result<Topic> {
    Ok(dsl::topics
        .select(Topic::as_select())
        .filter(dsl::id.eq(topic_id))
        .first(conn)?)
}

/// Get the board's topics and who started them, most recently active first.
pub fn in_board(conn: &mut SqliteConnection, board_id: i32) -> Result<Vec<(Topic, User)>> {
    Ok(dsl::topics
        .inner_join(users::table)
        .select((Topic::as_select(), User::as_select()))
        .filter(dsl::board_id.eq(board_id))
        .order((dsl::last_updated_us.desc(), dsl::id.desc()))
        .load::<(Topic, User)>(conn)?)
}

/// Count someone looking at the topic.
pub fn record_view(conn: &mut SqliteConnection, topic_id: i32) -> Result<Topic> {
    let topic = diesel::update(dsl::topics.filter(dsl::id.eq(topic_id)))
        .set((
            dsl::views.eq(dsl::views + 1),
            dsl::last_updated_us.eq(now_as_useconds()),
        ))
        .returning(Topic::as_returning())
        .get_result(conn)?;
    log::info!("Topic #{} viewed {} times", topic.id, topic.views);
    Ok(topic)
}

pub fn rename(conn: &mut SqliteConnection, topic_id: i32, subject: &str) -> Result<Topic> {
    let changes = TopicRename {
        subject: subject.trim(),
        last_updated_us: now_as_useconds(),
    };
    changes.validate()?;

    let topic = diesel::update(dsl::topics.filter(dsl::id.eq(topic_id)))
        .set(&changes)
        .returning(Topic::as_returning())
        .get_result(conn)?;
    log::info!("Renamed topic #{} to '{}'", topic.id, topic.subject);
    Ok(topic)
}

/// Mark the topic as just updated.
pub fn touch(conn: &mut SqliteConnection, topic_id: i32) -> Result<Topic> {
    let topic = diesel::update(dsl::topics.filter(dsl::id.eq(topic_id)))
        .set(dsl::last_updated_us.eq(now_as_useconds()))
        .returning(Topic::as_returning())
        .get_result(conn)?;
    log::info!("Touched topic #{}", topic.id);
    Ok(topic)
}

/// Get the number of posts in the topic, counting the opening one.
pub fn replies(conn: &mut SqliteConnection, topic_id: i32) -> Result<i64> {
    Ok(posts::table
        .filter(posts::topic_id.eq(topic_id))
        .count()
        .get_result(conn)?)
}

pub fn page_count(conn: &mut SqliteConnection, topic_id: i32) -> Result<u32> {
    Ok(paginate::page_count(replies(conn, topic_id)?))
}

pub fn has_many_pages(conn: &mut SqliteConnection, topic_id: i32) -> Result<bool> {
    Ok(paginate::has_many_pages(page_count(conn, topic_id)?))
}

/// The page numbers to link to from the board's topic list.
pub fn page_range(conn: &mut SqliteConnection, topic_id: i32) -> Result<Range<u32>> {
    Ok(paginate::page_range(page_count(conn, topic_id)?))
}

/// Get the newest posts in the topic, newest first.
pub fn last_ten_posts(conn: &mut SqliteConnection, topic_id: i32) -> Result<Vec<Post>> {
    Ok(posts::table
        .select(Post::as_select())
        .filter(posts::topic_id.eq(topic_id))
        .order((posts::created_at_us.desc(), posts::id.desc()))
        .limit(RECENT_POSTS)
        .load(conn)?)
}

/// Get every post in the topic, oldest first.
pub fn all_posts(conn: &mut SqliteConnection, topic_id: i32) -> Result<Vec<Post>> {
    Ok(posts::table
        .select(Post::as_select())
        .filter(posts::topic_id.eq(topic_id))
        .order((posts::created_at_us, posts::id))
        .load(conn)?)
}

/// Get one page of the topic's posts, oldest first. Pages start at 1.
pub fn page(conn: &mut SqliteConnection, topic_id: i32, page: u32) -> Result<Vec<Post>> {
    Ok(posts::table
        .select(Post::as_select())
        .filter(posts::topic_id.eq(topic_id))
        .order((posts::created_at_us, posts::id))
        .offset(paginate::offset(page))
        .limit(POSTS_PER_PAGE)
        .load(conn)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, boards, posts as post_ops, subjects, Board};

    fn board(conn: &mut SqliteConnection) -> (User, Board) {
        let user = db::test_user(conn, "starter");
        let subject = subjects::add(conn, "Travel").expect("subject");
        let board = boards::add(conn, "Trains", subject.id, "Rail trips", user.id).expect("board");
        (user, board)
    }

    /// A topic with exactly `total` posts, counting the opening one.
    fn topic_with_posts(conn: &mut SqliteConnection, total: usize) -> Topic {
        let (user, board) = board(conn);
        let (topic, _) = start(conn, board.id, user.id, "Sleepers", "post 0").expect("topic");
        for n in 1..total {
            post_ops::reply(conn, topic.id, user.id, &format!("post {n}")).expect("reply");
        }
        topic
    }

    #[test]
    fn starting_creates_the_opening_post() {
        let mut conn = db::test_connection();
        let (user, board) = board(&mut conn);
        let (topic, post) =
            start(&mut conn, board.id, user.id, " Night trains ", "Anyone?").expect("start");
        assert_eq!(topic.to_string(), "Night trains");
        assert_eq!(topic.views, 1);
        assert_eq!(topic.starter_id, user.id);
        assert_eq!(post.topic_id, topic.id);
        assert_eq!(post.created_by_id, user.id);
        assert_eq!(replies(&mut conn, topic.id).expect("replies"), 1);
    }

    #[test]
    fn bad_opening_post_leaves_nothing_behind() {
        let mut conn = db::test_connection();
        let (user, board) = board(&mut conn);
        assert!(start(&mut conn, board.id, user.id, "Empty", "").is_err());
        assert!(start(&mut conn, board.id, user.id, "Huge", &"m".repeat(4001)).is_err());
        assert!(in_board(&mut conn, board.id).expect("topics").is_empty());
    }

    #[test]
    fn blank_opening_post_is_refused() {
        let mut conn = db::test_connection();
        let (user, board) = board(&mut conn);
        assert!(start(&mut conn, board.id, user.id, "Quiet", "  \n\t ").is_err());
        assert!(in_board(&mut conn, board.id).expect("topics").is_empty());

        let (_, post) =
            start(&mut conn, board.id, user.id, "Loud", "\n  Hello  \n").expect("start");
        assert_eq!(post.message, "Hello");
    }

    #[test]
    fn views_bump_last_updated() {
        let mut conn = db::test_connection();
        let topic = topic_with_posts(&mut conn, 1);
        let viewed = record_view(&mut conn, topic.id).expect("view");
        let viewed = record_view(&mut conn, viewed.id).expect("view again");
        assert_eq!(viewed.views, 3);
        assert!(viewed.last_updated_us >= topic.last_updated_us);
    }

    #[test]
    fn rename_validates() {
        let mut conn = db::test_connection();
        let topic = topic_with_posts(&mut conn, 1);
        assert_eq!(
            rename(&mut conn, topic.id, "Couchettes").expect("rename").subject,
            "Couchettes"
        );
        assert!(rename(&mut conn, topic.id, &"s".repeat(256)).is_err());
        assert!(rename(&mut conn, topic.id, "  ").is_err());
    }

    #[test]
    fn most_recently_updated_topics_come_first() {
        let mut conn = db::test_connection();
        let (user, board) = board(&mut conn);
        let (older, _) = start(&mut conn, board.id, user.id, "Older", "first").expect("older");
        let (newer, _) = start(&mut conn, board.id, user.id, "Newer", "second").expect("newer");

        let order: Vec<i32> = in_board(&mut conn, board.id)
            .expect("topics")
            .iter()
            .map(|(topic, _)| topic.id)
            .collect();
        assert_eq!(order, vec![newer.id, older.id]);

        std::thread::sleep(std::time::Duration::from_micros(10));
        touch(&mut conn, older.id).expect("touch");
        let (first, starter) = in_board(&mut conn, board.id).expect("topics").remove(0);
        assert_eq!(first.id, older.id);
        assert_eq!(starter, user);
    }

    #[test]
    fn pagination_of_a_small_topic() {
        let mut conn = db::test_connection();
        let topic = topic_with_posts(&mut conn, 3);
        assert_eq!(page_count(&mut conn, topic.id).expect("count"), 2);
        assert!(!has_many_pages(&mut conn, topic.id).expect("many"));
        assert_eq!(page_range(&mut conn, topic.id).expect("range"), 1..3);
    }

    #[test]
    fn pagination_of_a_long_topic() {
        let mut conn = db::test_connection();
        let topic = topic_with_posts(&mut conn, 101);
        assert_eq!(page_count(&mut conn, topic.id).expect("count"), 7);
        assert!(has_many_pages(&mut conn, topic.id).expect("many"));
        assert_eq!(page_range(&mut conn, topic.id).expect("range"), 1..5);

        let first = page(&mut conn, topic.id, 1).expect("page 1");
        assert_eq!(first.len(), 20);
        assert_eq!(first[0].message, "post 0");
        let sixth = page(&mut conn, topic.id, 6).expect("page 6");
        assert_eq!(sixth.len(), 1);
        assert_eq!(sixth[0].message, "post 100");
        assert!(page(&mut conn, topic.id, 7).expect("page 7").is_empty());
        assert_eq!(page(&mut conn, topic.id, 0).expect("page 0"), first);
    }

    #[test]
    fn recent_and_all_posts() {
        let mut conn = db::test_connection();
        let topic = topic_with_posts(&mut conn, 12);

        let recent = last_ten_posts(&mut conn, topic.id).expect("recent");
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].message, "post 11");
        assert_eq!(recent[9].message, "post 2");

        let everything = all_posts(&mut conn, topic.id).expect("all");
        assert_eq!(everything.len(), 12);
        assert_eq!(everything[0].message, "post 0");
        assert_eq!(everything[11].message, "post 11");
    }
}
