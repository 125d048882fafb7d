mod commands;
mod render;
mod store;

use anyhow::Result;
use chrono::{Local, Timelike, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cinebook_core::session::SignupForm;
use commands::{App, Settings};

#[derive(Debug, Parser)]
#[command(name = "cinebook", version = "0.1.0")]
#[command(about = "Book movie tickets from the terminal - pick a show, choose seats, pay")]
struct Args {
    /// Backend base URL; sample data is used when unset or unreachable
    #[arg(long, env = "CINEBOOK_API_URL", global = true)]
    api_url: Option<String>,

    /// Directory holding the saved session, booking draft and bookings
    #[arg(long, default_value = ".cinebook", global = true)]
    profile_dir: PathBuf,

    /// Booking configuration JSON (seat cap, row width, prices)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// OMDb API key used to enrich movie details
    #[arg(long, env = "CINEBOOK_OMDB_KEY", global = true)]
    omdb_key: Option<String>,

    /// Seed for demo seat occupancy and show availability (defaults to today)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Hour of the day (0-23) before which shows are hidden (defaults to now)
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(0..24))]
    hour: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the movies now showing
    Movies {
        /// Only movies whose title, genre, plot or cast contains this text
        #[arg(long)]
        search: Option<String>,
        /// Only movies of this genre
        #[arg(long)]
        genre: Option<String>,
    },
    /// List show times for a movie
    Shows { movie_id: u64 },
    /// Start a booking for a demo slot (--theater, --time) or a backend show (--show)
    Select {
        movie_id: u64,
        /// Demo theater id
        #[arg(long, requires = "time", conflicts_with = "show")]
        theater: Option<u32>,
        /// Demo show time, e.g. "7:00 PM"
        #[arg(long, requires = "theater")]
        time: Option<String>,
        /// Backend show id
        #[arg(long, required_unless_present = "theater")]
        show: Option<u64>,
    },
    /// Show the seat map for the booking in progress
    Seats {
        /// Number of tickets wanted; caps how many seats can be picked
        #[arg(long)]
        count: Option<usize>,
        /// Drop every selected seat
        #[arg(long)]
        clear: bool,
    },
    /// Select or deselect seats, e.g. `toggle A1 A2`
    Toggle {
        #[arg(required = true)]
        seats: Vec<String>,
    },
    /// Lock in the selected seats and move on to payment
    Confirm,
    /// Pay for the confirmed booking
    Pay {
        /// Skip the simulated processing delay
        #[arg(long)]
        no_wait: bool,
        /// Also e-mail the ticket to this address
        #[arg(long)]
        email: Option<String>,
    },
    /// List your bookings (requires login)
    Bookings,
    /// Cancel a booking (requires login)
    Cancel { booking_id: String },
    /// Sign in
    Login {
        username: String,
        #[arg(long, env = "CINEBOOK_PASSWORD")]
        password: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account
    Signup {
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CINEBOOK_PASSWORD")]
        password: String,
        /// Repeat the password
        #[arg(long)]
        password_confirm: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Print or save the ticket for a booking
    Ticket {
        booking_id: String,
        /// File or directory to write the ticket to instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Demo availability is stable for a calendar day.
#[allow(clippy::cast_sign_loss)]
fn daily_seed() -> u64 {
    (Utc::now().timestamp() / 86_400) as u64
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = Settings {
        profile_dir: args.profile_dir,
        config_path: args.config,
        api_url: args.api_url,
        omdb_key: args.omdb_key,
        seed: args.seed.unwrap_or_else(daily_seed),
        hour: args.hour.unwrap_or_else(|| Local::now().hour()),
    };
    let mut app = App::open(&settings)?;

    match args.command {
        Command::Movies { search, genre } => {
            app.movies(search.as_deref().unwrap_or_default(), genre.as_deref())
                .await
        }
        Command::Shows { movie_id } => app.shows(movie_id).await,
        Command::Select {
            movie_id,
            theater,
            time,
            show,
        } => match (show, theater, time) {
            (Some(show_id), _, _) => app.select_remote(movie_id, show_id).await,
            (None, Some(theater_id), Some(time)) => {
                app.select_demo(movie_id, theater_id, &time).await
            }
            _ => anyhow::bail!("Pass either --show, or --theater with --time."),
        },
        Command::Seats { count, clear } => app.seats(count, clear),
        Command::Toggle { seats } => app.toggle(&seats),
        Command::Confirm => app.confirm().await,
        Command::Pay { no_wait, email } => app.pay(!no_wait, email.as_deref()).await,
        Command::Bookings => app.bookings().await,
        Command::Cancel { booking_id } => app.cancel(&booking_id).await,
        Command::Login {
            username,
            password,
            email,
        } => app.login(username, password, email).await,
        Command::Signup {
            username,
            email,
            password,
            password_confirm,
        } => {
            app.signup(SignupForm {
                username,
                email,
                password,
                password_confirm,
            })
            .await
        }
        Command::Logout => app.logout(),
        Command::Whoami => {
            app.whoami();
            Ok(())
        }
        Command::Ticket { booking_id, output } => {
            app.ticket(&booking_id, output.as_deref()).await
        }
    }
}
