use crate::db::{
    self, actions, boards, cities, countries, posts, readers, subjects, topics, users, Result,
};
use crate::{formatted_useconds, paginate, BlogConfig};
use diesel::SqliteConnection;

/// How many audit records `action_log` shows.
const ACTION_LOG_LENGTH: i64 = 50;

/// The effective configuration as TOML.
fn config_text(cfg: &BlogConfig) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}

pub fn config_show(cfg: &BlogConfig) -> Result<()> {
    print!("{}", config_text(cfg)?);
    Ok(())
}

pub fn stats(connection: &mut SqliteConnection) -> Result<()> {
    println!("{}", db::stats(connection)?);
    Ok(())
}

pub fn country_list(connection: &mut SqliteConnection) -> Result<()> {
    println!(
        "\
# Countries

| Num | Name                           |
| --- | ------------------------------ |"
    );
    for country in countries::all(connection)? {
        println!("| {:3} | {:30} |", country.id, country.name);
    }
    Ok(())
}

pub fn country_add(connection: &mut SqliteConnection, name: &str) -> Result<()> {
    let country = countries::add(connection, name)?;
    println!("Created country #{}, '{}'", country.id, country);
    Ok(())
}

pub fn city_list(connection: &mut SqliteConnection, country_id: Option<i32>) -> Result<()> {
    let cities = match country_id {
        Some(country_id) => cities::in_country(connection, country_id)?,
        None => cities::all(connection)?,
    };
    println!(
        "\
# Cities

| Num | Country | Name                           |
| --- | ------- | ------------------------------ |"
    );
    for city in cities {
        println!("| {:3} | {:7} | {:30} |", city.id, city.country_id, city.name);
    }
    Ok(())
}

pub fn city_add(connection: &mut SqliteConnection, name: &str, country_id: i32) -> Result<()> {
    let city = cities::add(connection, name, country_id)?;
    println!("Created city #{}, '{}'", city.id, city);
    Ok(())
}

pub fn user_list(connection: &mut SqliteConnection) -> Result<()> {
    println!(
        "\
# Users

| Joined at           | Last login          | Num | Username             | Roles           | Active |
| ------------------- | ------------------- | --- | -------------------- | --------------- | ------ |"
    );
    for user in users::all(connection)? {
        println!(
            "| {} | {:19} | {:3} | {:20} | {:15} | {:6} |",
            user.date_joined(),
            user.last_login(),
            user.id,
            user.username,
            user.roles(),
            if user.is_active { "yes" } else { "no" },
        );
    }
    Ok(())
}

pub fn user_add(
    connection: &mut SqliteConnection,
    username: &str,
    email: Option<&str>,
    city_id: i32,
    is_reporter: bool,
    is_reader: bool,
) -> Result<()> {
    let user = users::add(
        connection,
        username,
        email,
        city_id,
        is_reporter,
        is_reader,
    )?;
    println!("Created user #{}, '{}'", user.id, user);
    Ok(())
}

pub fn user_roles(
    connection: &mut SqliteConnection,
    username: &str,
    is_reporter: bool,
    is_reader: bool,
) -> Result<()> {
    let user = users::find(connection, username)?;
    let user = users::set_roles(connection, user.id, is_reporter, is_reader)?;
    println!("'{}' is now {}", user, user.roles());
    Ok(())
}

pub fn user_deactivate(connection: &mut SqliteConnection, username: &str) -> Result<()> {
    let user = users::find(connection, username)?;
    users::deactivate(connection, user.id)?;
    println!("Deactivated '{user}'");
    Ok(())
}

pub fn subject_list(connection: &mut SqliteConnection) -> Result<()> {
    println!(
        "\
# Subjects

| Num | Name                                               |
| --- | -------------------------------------------------- |"
    );
    for subject in subjects::all(connection)? {
        println!("| {:3} | {:50} |", subject.id, subject.name);
    }
    Ok(())
}

pub fn subject_add(connection: &mut SqliteConnection, name: &str) -> Result<()> {
    let subject = subjects::add(connection, name)?;
    println!("Created subject {subject}");
    Ok(())
}

pub fn board_list(connection: &mut SqliteConnection, include_deleted: bool) -> Result<()> {
    let all_boards = if include_deleted {
        boards::all(connection)?
    } else {
        boards::active(connection)?
    };
    println!(
        "\
# Boards

| Created at          | Num | Name                           | Topics | Posts | Last post           | Description |
| ------------------- | --- | ------------------------------ | ------ | ----- | ------------------- | ----------- |"
    );
    for board in all_boards {
        let last_post = match boards::last_post(connection, board.id)? {
            Some(post) => post.created_at(),
            None => "-".to_string(),
        };
        println!(
            "| {} | {:3} | {:30} | {:6} | {:5} | {:19} | {}{} |",
            board.created_at(),
            board.id,
            board.name,
            boards::topics_count(connection, board.id)?,
            boards::posts_count(connection, board.id)?,
            last_post,
            board.description,
            if board.is_deleted { " (deleted)" } else { "" },
        );
    }
    Ok(())
}

pub fn board_add(
    connection: &mut SqliteConnection,
    name: &str,
    subject_id: i32,
    description: &str,
    creator: &str,
) -> Result<()> {
    let creator = users::find(connection, creator)?;
    let board = boards::add(connection, name, subject_id, description, creator.id)?;
    println!("Created board #{}, '{}'", board.id, board);
    Ok(())
}

pub fn board_edit(
    connection: &mut SqliteConnection,
    board_id: i32,
    name: &str,
    description: &str,
) -> Result<()> {
    let board = boards::edit(connection, board_id, name, description)?;
    println!("Updated board #{}, '{}'", board.id, board);
    Ok(())
}

pub fn board_delete(connection: &mut SqliteConnection, board_id: i32, purge: bool) -> Result<()> {
    if purge {
        let deleted = boards::purge(connection, board_id)?;
        println!("Purged {deleted} board(s)");
    } else {
        let board = boards::soft_delete(connection, board_id)?;
        println!("Flagged board #{}, '{}' as deleted", board.id, board);
    }
    Ok(())
}

pub fn reader_list(connection: &mut SqliteConnection) -> Result<()> {
    println!(
        "\
# Readers

| Num | Username             | Interests |
| --- | -------------------- | --------- |"
    );
    for profile in readers::all(connection)? {
        let interests: Vec<&str> = profile
            .interests
            .iter()
            .map(|subject| subject.name.as_str())
            .collect();
        println!(
            "| {:3} | {:20} | {} |",
            profile.user.id,
            profile.user.username,
            interests.join(", "),
        );
    }
    Ok(())
}

pub fn reader_enroll(
    connection: &mut SqliteConnection,
    username: &str,
    subject_ids: &[i32],
) -> Result<()> {
    let user = users::find(connection, username)?;
    let profile = readers::enroll(connection, user.id, subject_ids)?;
    println!(
        "'{}' reads {} subject(s)",
        profile,
        profile.interests.len()
    );
    Ok(())
}

pub fn reader_boards(connection: &mut SqliteConnection, username: &str) -> Result<()> {
    let user = users::find(connection, username)?;
    println!("# Boards for '{user}'\n");
    for board in readers::recommended_boards(connection, user.id)? {
        println!("- #{} {}: {}", board.id, board.name, board.description);
    }
    Ok(())
}

pub fn topic_list(connection: &mut SqliteConnection, board_id: i32) -> Result<()> {
    let board = boards::get(connection, board_id)?;
    println!("# Topics in '{board}'\n");

    let topic_info = topics::in_board(connection, board_id)?;
    if topic_info.is_empty() {
        println!("There are no topics in board #{board_id}");
        return Ok(());
    }

    println!(
        "\
| Last updated        | Num | Starter              | Replies | Views | Pages | Subject |
| ------------------- | --- | -------------------- | ------- | ----- | ----- | ------- |"
    );
    for (topic, starter) in topic_info {
        let page_count = topics::page_count(connection, topic.id)?;
        let mut pages: Vec<String> = paginate::page_range(page_count)
            .map(|page| page.to_string())
            .collect();
        if paginate::has_many_pages(page_count) {
            pages.push(format!("..{page_count}"));
        }
        println!(
            "| {} | {:3} | {:20} | {:7} | {:5} | {:5} | {} |",
            topic.last_updated(),
            topic.id,
            starter.username,
            // The opening post isn't a reply.
            topics::replies(connection, topic.id)? - 1,
            topic.views,
            pages.join(" "),
            topic,
        );
    }
    Ok(())
}

pub fn topic_start(
    connection: &mut SqliteConnection,
    board_id: i32,
    username: &str,
    subject: &str,
    message: &str,
) -> Result<()> {
    let user = users::find(connection, username)?;
    let (topic, _) = topics::start(connection, board_id, user.id, subject, message)?;
    println!("Started topic #{}, '{}'", topic.id, topic);
    Ok(())
}

pub fn topic_read(
    connection: &mut SqliteConnection,
    topic_id: i32,
    page: u32,
    html: bool,
) -> Result<()> {
    let topic = topics::record_view(connection, topic_id)?;
    let page_count = topics::page_count(connection, topic_id)?;
    println!(
        "# {}\n\nPage {}/{}, viewed {} times\n",
        topic,
        page.max(1),
        page_count,
        topic.views
    );

    for post in topics::page(connection, topic_id, page)? {
        let author = users::get(connection, post.created_by_id)?;
        println!("## {} at {}", author, post.created_at());
        if let Some(updated_at) = post.updated_at() {
            println!("(edited {updated_at})");
        }
        println!();
        if html {
            print!("{}", post.message_as_markdown());
        } else {
            println!("{}", post.message);
        }
        println!();
    }
    Ok(())
}

pub fn post_list(connection: &mut SqliteConnection, topic_id: i32) -> Result<()> {
    println!(
        "\
| Created at          | Num | Author               | Message                        |
| ------------------- | --- | -------------------- | ------------------------------ |"
    );
    for post in topics::last_ten_posts(connection, topic_id)? {
        let author = users::get(connection, post.created_by_id)?;
        println!(
            "| {} | {:3} | {:20} | {:30} |",
            post.created_at(),
            post.id,
            author.username,
            post,
        );
    }
    Ok(())
}

pub fn post_add(
    connection: &mut SqliteConnection,
    topic_id: i32,
    username: &str,
    content: &str,
) -> Result<()> {
    let user = users::find(connection, username)?;
    let post = posts::reply(connection, topic_id, user.id, content)?;
    println!("Created post #{}", post.id);
    Ok(())
}

pub fn post_edit(
    connection: &mut SqliteConnection,
    post_id: i32,
    username: &str,
    content: &str,
) -> Result<()> {
    let user = users::find(connection, username)?;
    let post = posts::edit(connection, post_id, user.id, content)?;
    println!("Updated post #{}", post.id);
    Ok(())
}

pub fn action_log(connection: &mut SqliteConnection, board_id: Option<i32>) -> Result<()> {
    println!(
        "\
# Board actions

| Created at          | Action | Entry |
| ------------------- | ------ | ----- |"
    );
    match board_id {
        Some(board_id) => {
            let board = boards::get(connection, board_id)?;
            for action in actions::for_board(connection, board_id)? {
                println!(
                    "| {} | {:6} | {}-{} |",
                    action.created_at(),
                    action.kind()?.label(),
                    board,
                    action.action,
                );
            }
        }
        None => {
            for entry in actions::recent(connection, ACTION_LOG_LENGTH)? {
                println!(
                    "| {} | {:6} | {} |",
                    formatted_useconds(entry.action.created_at_us),
                    entry.action.kind()?.label(),
                    entry,
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_renders_as_toml() {
        let cfg = BlogConfig {
            db_path: "/var/lib/blogboards/blog.db".into(),
            log_level: "debug".into(),
        };
        let text = config_text(&cfg).expect("render");
        assert!(text.contains("db_path = \"/var/lib/blogboards/blog.db\""));
        assert!(text.contains("log_level = \"debug\""));
        assert!(config_show(&BlogConfig::default()).is_ok());
    }
}
