use blogboards::{admin, db, BlogConfig, Error};
use clap::{Parser, Subcommand};
use simple_logger::SimpleLogger;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Read the configuration from this file instead of the XDG config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debugging information.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Subsystems>,
}

#[derive(Debug, Subcommand)]
enum Subsystems {
    /// Configuration commands
    #[command(arg_required_else_help = true)]
    Config {
        #[command(subcommand)]
        config_command: Option<ConfigCommands>,
    },
    /// Show how many of everything there are.
    Stats {},
    /// Admin commands
    #[command(arg_required_else_help = true)]
    Admin {
        #[command(subcommand)]
        admin_command: Option<AdminCommands>,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration.
    Show {},
}

#[derive(Debug, Subcommand)]
enum AdminCommands {
    /// Country commands
    #[command(arg_required_else_help = true)]
    Country {
        #[command(subcommand)]
        country_command: Option<AdminCountryCommands>,
    },
    /// City commands
    #[command(arg_required_else_help = true)]
    City {
        #[command(subcommand)]
        city_command: Option<AdminCityCommands>,
    },
    /// User commands
    #[command(arg_required_else_help = true)]
    User {
        #[command(subcommand)]
        user_command: Option<AdminUserCommands>,
    },
    /// Subject commands
    #[command(arg_required_else_help = true)]
    Subject {
        #[command(subcommand)]
        subject_command: Option<AdminSubjectCommands>,
    },
    /// Board commands
    #[command(arg_required_else_help = true)]
    Board {
        #[command(subcommand)]
        board_command: Option<AdminBoardCommands>,
    },
    /// Reader commands
    #[command(arg_required_else_help = true)]
    Reader {
        #[command(subcommand)]
        reader_command: Option<AdminReaderCommands>,
    },
    /// Topic commands
    #[command(arg_required_else_help = true)]
    Topic {
        #[command(subcommand)]
        topic_command: Option<AdminTopicCommands>,
    },
    /// Post commands
    #[command(arg_required_else_help = true)]
    Post {
        #[command(subcommand)]
        post_command: Option<AdminPostCommands>,
    },
    /// Show the board audit log.
    Actions {
        /// Only show actions on this board.
        #[arg(short, long)]
        board_id: Option<i32>,
    },
}

#[derive(Debug, Subcommand)]
enum AdminCountryCommands {
    /// List all countries.
    List {},
    /// Add a new country.
    Add {
        #[arg(short, long)]
        name: String,
    },
}

#[derive(Debug, Subcommand)]
enum AdminCityCommands {
    /// List cities.
    List {
        /// Only list cities in this country.
        #[arg(short, long)]
        country_id: Option<i32>,
    },
    /// Add a new city.
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        country_id: i32,
    },
}

#[derive(Debug, Subcommand)]
enum AdminUserCommands {
    /// List all users.
    List {},
    /// Add a new user.
    Add {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: Option<String>,
        /// The city the user lives in.
        #[arg(short, long)]
        city_id: i32,
        /// Allow the user to write.
        #[arg(long)]
        reporter: bool,
        /// Mark the user as a reader.
        #[arg(long)]
        reader: bool,
    },
    /// Set the user's role flags.
    Roles {
        #[arg(short, long)]
        username: String,
        #[arg(long)]
        reporter: bool,
        #[arg(long)]
        reader: bool,
    },
    /// Disable the user's account.
    Deactivate {
        #[arg(short, long)]
        username: String,
    },
}

#[derive(Debug, Subcommand)]
enum AdminSubjectCommands {
    /// List all subjects.
    List {},
    /// Add a new subject.
    Add {
        #[arg(short, long)]
        name: String,
    },
}

#[derive(Debug, Subcommand)]
enum AdminBoardCommands {
    /// List boards.
    List {
        /// Include boards flagged as deleted.
        #[arg(short, long)]
        all: bool,
    },
    /// Add a new board.
    Add {
        /// Name of the board to add.
        #[arg(short, long)]
        name: String,
        /// Number of the board's subject.
        #[arg(short, long)]
        subject_id: i32,
        /// Description of the new board.
        #[arg(short, long)]
        description: String,
        /// Username of the board's creator.
        #[arg(short, long)]
        creator: String,
    },
    /// Change a board's name and description.
    Edit {
        #[arg(short, long)]
        board_id: i32,
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: String,
    },
    /// Flag a board as deleted.
    Delete {
        #[arg(short, long)]
        board_id: i32,
        /// Really delete it, with all of its topics and posts.
        #[arg(long)]
        purge: bool,
    },
}

#[derive(Debug, Subcommand)]
enum AdminReaderCommands {
    /// List all readers and their interests.
    List {},
    /// Make a user a reader.
    Enroll {
        #[arg(short, long)]
        username: String,
        /// Numbers of the subjects they follow.
        #[arg(short, long, value_delimiter = ',')]
        subject_ids: Vec<i32>,
    },
    /// Show the boards a reader would be interested in.
    Boards {
        #[arg(short, long)]
        username: String,
    },
}

#[derive(Debug, Subcommand)]
enum AdminTopicCommands {
    /// List a board's topics.
    List {
        #[arg(short, long)]
        board_id: i32,
    },
    /// Start a new topic.
    Start {
        #[arg(short, long)]
        board_id: i32,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        subject: String,
        /// Body of the opening post.
        #[arg(short, long)]
        content: String,
    },
    /// Read a page of a topic.
    Read {
        #[arg(short, long)]
        topic_id: i32,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// Render posts as HTML.
        #[arg(long)]
        html: bool,
    },
}

#[derive(Debug, Subcommand)]
enum AdminPostCommands {
    /// List a topic's latest posts.
    List {
        #[arg(short, long)]
        topic_id: i32,
    },
    /// Add a new post.
    Add {
        /// Number of the topic to reply to.
        #[arg(short, long)]
        topic_id: i32,
        #[arg(short, long)]
        username: String,
        /// Body of the new post.
        #[arg(short, long)]
        content: String,
    },
    /// Change a post's message.
    Edit {
        #[arg(short, long)]
        post_id: i32,
        /// Username of the editor.
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        content: String,
    },
}

fn run(cli: &Cli) -> Result<(), Error> {
    let cfg = BlogConfig::load(cli.config.as_deref())?;
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        cfg.level_filter()
    };
    SimpleLogger::new().with_level(level).init()?;

    if let Some(Subsystems::Config { config_command }) = &cli.command {
        if let Some(ConfigCommands::Show {}) = config_command {
            admin::config_show(&cfg)?;
        }
        return Ok(());
    }

    let conn = &mut db::establish_connection(&cfg)?;

    match &cli.command {
        Some(Subsystems::Stats {}) => admin::stats(conn),
        Some(Subsystems::Admin { admin_command }) => match admin_command {
            Some(AdminCommands::Country { country_command }) => match country_command {
                Some(AdminCountryCommands::List {}) => admin::country_list(conn),
                Some(AdminCountryCommands::Add { name }) => admin::country_add(conn, name),
                None => Ok(()),
            },
            Some(AdminCommands::City { city_command }) => match city_command {
                Some(AdminCityCommands::List { country_id }) => {
                    admin::city_list(conn, *country_id)
                }
                Some(AdminCityCommands::Add { name, country_id }) => {
                    admin::city_add(conn, name, *country_id)
                }
                None => Ok(()),
            },
            Some(AdminCommands::User { user_command }) => match user_command {
                Some(AdminUserCommands::List {}) => admin::user_list(conn),
                Some(AdminUserCommands::Add {
                    username,
                    email,
                    city_id,
                    reporter,
                    reader,
                }) => admin::user_add(
                    conn,
                    username,
                    email.as_deref(),
                    *city_id,
                    *reporter,
                    *reader,
                ),
                Some(AdminUserCommands::Roles {
                    username,
                    reporter,
                    reader,
                }) => admin::user_roles(conn, username, *reporter, *reader),
                Some(AdminUserCommands::Deactivate { username }) => {
                    admin::user_deactivate(conn, username)
                }
                None => Ok(()),
            },
            Some(AdminCommands::Subject { subject_command }) => match subject_command {
                Some(AdminSubjectCommands::List {}) => admin::subject_list(conn),
                Some(AdminSubjectCommands::Add { name }) => admin::subject_add(conn, name),
                None => Ok(()),
            },
            Some(AdminCommands::Board { board_command }) => match board_command {
                Some(AdminBoardCommands::List { all }) => admin::board_list(conn, *all),
                Some(AdminBoardCommands::Add {
                    name,
                    subject_id,
                    description,
                    creator,
                }) => admin::board_add(conn, name, *subject_id, description, creator),
                Some(AdminBoardCommands::Edit {
                    board_id,
                    name,
                    description,
                }) => admin::board_edit(conn, *board_id, name, description),
                Some(AdminBoardCommands::Delete { board_id, purge }) => {
                    admin::board_delete(conn, *board_id, *purge)
                }
                None => Ok(()),
            },
            Some(AdminCommands::Reader { reader_command }) => match reader_command {
                Some(AdminReaderCommands::List {}) => admin::reader_list(conn),
                Some(AdminReaderCommands::Enroll {
                    username,
                    subject_ids,
                }) => admin::reader_enroll(conn, username, subject_ids),
                Some(AdminReaderCommands::Boards { username }) => {
                    admin::reader_boards(conn, username)
                }
                None => Ok(()),
            },
            Some(AdminCommands::Topic { topic_command }) => match topic_command {
                Some(AdminTopicCommands::List { board_id }) => admin::topic_list(conn, *board_id),
                Some(AdminTopicCommands::Start {
                    board_id,
                    username,
                    subject,
                    content,
                }) => admin::topic_start(conn, *board_id, username, subject, content),
                Some(AdminTopicCommands::Read {
                    topic_id,
                    page,
                    html,
                }) => admin::topic_read(conn, *topic_id, *page, *html),
                None => Ok(()),
            },
            Some(AdminCommands::Post { post_command }) => match post_command {
                Some(AdminPostCommands::List { topic_id }) => admin::post_list(conn, *topic_id),
                Some(AdminPostCommands::Add {
                    topic_id,
                    username,
                    content,
                }) => admin::post_add(conn, *topic_id, username, content),
                Some(AdminPostCommands::Edit {
                    post_id,
                    username,
                    content,
                }) => admin::post_edit(conn, *post_id, username, content),
                None => Ok(()),
            },
            Some(AdminCommands::Actions { board_id }) => admin::action_log(conn, *board_id),
            None => Ok(()),
        },
        Some(Subsystems::Config { .. }) | None => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        // The logger may not be up yet if that's what failed.
        eprintln!("Error: {err}");
        log::debug!("{err:?}");
        std::process::exit(1);
    }
}
