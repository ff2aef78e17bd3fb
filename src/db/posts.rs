use super::models::{NewPost, Post, PostEdit};
use super::schema::posts::{dsl, table};
use super::{now_as_useconds, topics, Result};
use crate::Error;
use diesel::prelude::*;
use validator::Validate as _;

/// Reply to a topic. The topic counts as updated.
pub fn reply(
    conn: &mut SqliteConnection,
    topic_id: i32,
    user_id: i32,
    message: &str,
) -> Result<Post> {
    let new_post = NewPost {
        message: message.trim(),
        topic_id,
        created_at_us: now_as_useconds(),
        created_by_id: user_id,
    };
    new_post.validate()?;

    let post = conn.transaction::<_, Error, _>(|conn| {
        let post = diesel::insert_into(table)
            .values(&new_post)
            .returning(Post::as_returning())
            .get_result(conn)?;
        topics::touch(conn, topic_id)?;
        Ok(post)
    })?;
    log::info!("Added post #{} to topic #{}", post.id, topic_id);
    Ok(post)
}

/// Replace a post's message, noting who changed it and when.
pub fn edit(
    conn: &mut SqliteConnection,
    post_id: i32,
    editor_id: i32,
    message: &str,
) -> Result<Post> {
    let changes = PostEdit {
        message: message.trim(),
        updated_at_us: Some(now_as_useconds()),
        updated_by_id: Some(editor_id),
    };
    changes.validate()?;

    let post = diesel::update(dsl::posts.filter(dsl::id.eq(post_id)))
        .set(&changes)
        .returning(Post::as_returning())
        .get_result(conn)?;
    log::info!("Edited post #{}", post.id);
    Ok(post)
}

pub fn get(conn: &mut SqliteConnection, post_id: i32) -> Result<Post> {
    Ok(dsl::posts
        .select(Post::as_select())
        .filter(dsl::id.eq(post_id))
        .first(conn)?)
}

/// Get everything someone has written, newest first.
pub fn by_user(conn: &mut SqliteConnection, user_id: i32) -> Result<Vec<Post>> {
    Ok(dsl::posts
        .select(Post::as_select())
        .filter(dsl::created_by_id.eq(user_id))
        .order((dsl::created_at_us.desc(), dsl::id.desc()))
        .load(conn)?)
}

pub fn delete(conn: &mut SqliteConnection, post_id: i32) -> Result<usize> {
    let deleted = diesel::delete(dsl::posts.filter(dsl::id.eq(post_id))).execute(conn)?;
    if deleted > 0 {
        log::info!("Deleted post #{post_id}");
    }
    Ok(deleted)
}

/// Get the number of posts
pub fn count(conn: &mut SqliteConnection) -> Result<i64> {
    Ok(dsl::posts.count().get_result(conn)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, boards, subjects, topics, users, Topic, User};
    use std::thread::sleep;
    use std::time::Duration;

    fn topic(conn: &mut SqliteConnection) -> (User, Topic) {
        let user = db::test_user(conn, "poster");
        let subject = subjects::add(conn, "Books").expect("subject");
        let board = boards::add(conn, "Novels", subject.id, "Fiction", user.id).expect("board");
        let (topic, _) = topics::start(conn, board.id, user.id, "Dune", "Spice").expect("topic");
        (user, topic)
    }

    #[test]
    fn replying_touches_the_topic() {
        let mut conn = db::test_connection();
        let (user, topic) = topic(&mut conn);
        sleep(Duration::from_micros(10));

        let post = reply(&mut conn, topic.id, user.id, "Worms!").expect("reply");
        assert_eq!(post.topic_id, topic.id);
        assert_eq!(post.updated_at_us, None);
        assert_eq!(post.updated_by_id, None);

        let touched = topics::get(&mut conn, topic.id).expect("topic");
        assert!(touched.last_updated_us > topic.last_updated_us);
        assert_eq!(count(&mut conn).expect("count"), 2);
    }

    #[test]
    fn replies_need_a_real_topic() {
        let mut conn = db::test_connection();
        let (user, _) = topic(&mut conn);
        assert!(reply(&mut conn, 999, user.id, "Lost").is_err());
        assert_eq!(count(&mut conn).expect("count"), 1);
    }

    #[test]
    fn editing_records_the_editor() {
        let mut conn = db::test_connection();
        let (author, topic) = topic(&mut conn);
        let editor = users::add(&mut conn, "editor", None, author.city_id, true, false)
            .expect("editor");
        let post = reply(&mut conn, topic.id, author.id, "Teh spice").expect("reply");

        let edited = edit(&mut conn, post.id, editor.id, "The spice").expect("edit");
        assert_eq!(edited.message, "The spice");
        assert_eq!(edited.created_by_id, author.id);
        assert_eq!(edited.updated_by_id, Some(editor.id));
        assert!(edited.updated_at().is_some());

        assert!(edit(&mut conn, post.id, editor.id, "").is_err());
        assert_eq!(get(&mut conn, post.id).expect("post").message, "The spice");
    }

    #[test]
    fn posts_by_user_newest_first() {
        let mut conn = db::test_connection();
        let (user, topic) = topic(&mut conn);
        let second = reply(&mut conn, topic.id, user.id, "second").expect("second");

        let mine = by_user(&mut conn, user.id).expect("posts");
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0], second);
        assert_eq!(mine[1].message, "Spice");
    }

    #[test]
    fn deleting_one_post_keeps_the_topic() {
        let mut conn = db::test_connection();
        let (user, topic) = topic(&mut conn);
        let post = reply(&mut conn, topic.id, user.id, "oops").expect("reply");

        assert_eq!(delete(&mut conn, post.id).expect("delete"), 1);
        assert!(get(&mut conn, post.id).expect_err("gone").is_not_found());
        assert_eq!(topics::replies(&mut conn, topic.id).expect("replies"), 1);
        assert_eq!(delete(&mut conn, post.id).expect("delete again"), 0);
    }

    #[test]
    fn blank_messages_are_refused() {
        let mut conn = db::test_connection();
        let (user, topic) = topic(&mut conn);
        assert!(reply(&mut conn, topic.id, user.id, " \n\t ").is_err());
        assert_eq!(count(&mut conn).expect("count"), 1);

        let post = reply(&mut conn, topic.id, user.id, "  padded  \n").expect("reply");
        assert_eq!(post.message, "padded");
        assert!(edit(&mut conn, post.id, user.id, "   ").is_err());
        assert_eq!(get(&mut conn, post.id).expect("post").message, "padded");
    }

    #[test]
    fn long_messages_are_shortened_for_display() {
        let mut conn = db::test_connection();
        let (user, topic) = topic(&mut conn);
        let post = reply(
            &mut conn,
            topic.id,
            user.id,
            "A desert planet, a noble family, and a great deal of sand.",
        )
        .expect("reply");
        assert_eq!(post.to_string(), "A desert planet, a noble fami…");
    }
}
