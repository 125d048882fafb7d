use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use cinebook_core::catalog::{DEFAULT_VENUE_SEATS, find_theater, remote_show_context};
use cinebook_core::flow::enter;
use cinebook_core::gateway::{Credentials, GatewayConfig};
use cinebook_core::messages::{
    cancel_message, email_message, gateway_message, reservation_message, toggle_message,
};
use cinebook_core::my_bookings::{cancel_booking, load_my_bookings};
use cinebook_core::session::SignupForm;
use cinebook_core::store::{read_json, remove, write_json};
use cinebook_core::ticket::{render_ticket_text, ticket_file_name};
use cinebook_core::{
    AppRoute, BookingConfig, BookingEntry, BookingLedger, CatalogGateway, Enricher,
    FallbackGateway, GatewayError, HttpGateway, InventorySource, MetadataProvider, MockGateway,
    Movie, OmdbProvider, PaymentScreen, Redirect, SeatScreen, Session, Show, SyntheticInventory,
    TicketSummary, ToggleOutcome, demo_theaters, filter_movies, movie_genres, select_show,
    show_slots, slot_context,
};

use crate::render;
use crate::store::FileStore;

/// Backend show picked with `select --show`, kept so later invocations can
/// build the seat map from its booked seats.
pub const SHOW_KEY: &str = "cinebook.cli.show";

pub type CliGateway = FallbackGateway<HttpGateway>;

/// Everything one invocation needs.
pub struct Settings {
    pub profile_dir: PathBuf,
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub omdb_key: Option<String>,
    pub seed: u64,
    pub hour: u32,
}

pub struct App {
    store: FileStore,
    config: BookingConfig,
    gateway: CliGateway,
    enricher: Enricher,
    session: Session,
    seed: u64,
    hour: u32,
}

/// Booking tunables from `path`, or the built-in defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid configuration.
pub fn load_config(path: Option<&Path>) -> Result<BookingConfig> {
    let Some(path) = path else {
        return Ok(BookingConfig::default_config());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read booking config {}", path.display()))?;
    BookingConfig::from_json(&raw)
        .with_context(|| format!("Invalid booking config {}", path.display()))
}

fn redirect_error(redirect: Redirect) -> anyhow::Error {
    match redirect {
        Redirect::Catalog => anyhow!(
            "No booking in progress. Pick a show first: `cinebook shows <movie>` then `cinebook select`."
        ),
        Redirect::Login => anyhow!("Please log in first: `cinebook login <username>`."),
    }
}

fn gateway_error(err: &GatewayError) -> anyhow::Error {
    anyhow!(gateway_message(err))
}

impl App {
    /// # Errors
    ///
    /// Returns an error if the profile store or configuration cannot be loaded.
    pub fn open(settings: &Settings) -> Result<Self> {
        let store = FileStore::open(&settings.profile_dir)?;
        let config = load_config(settings.config_path.as_deref())?;
        let remote = HttpGateway::new(&GatewayConfig::from_url(settings.api_url.as_deref()))
            .unwrap_or_else(|err| {
                log::warn!("HTTP gateway unavailable, using demo data: {err}");
                None
            });
        let gateway = FallbackGateway::new(remote, MockGateway::new(Utc::now));
        let session = Session::hydrate(&store);
        gateway.set_token(session.token());
        let providers: Vec<Box<dyn MetadataProvider>> = settings
            .omdb_key
            .clone()
            .map(|key| Box::new(OmdbProvider::new(key)) as Box<dyn MetadataProvider>)
            .into_iter()
            .collect();
        Ok(Self {
            store,
            config,
            gateway,
            enricher: Enricher::new(providers),
            session,
            seed: settings.seed,
            hour: settings.hour,
        })
    }

    fn demo_notice(&self) {
        if self.gateway.is_mock() {
            println!("{}", "Demo Mode: showing sample data.".yellow());
        }
    }

    /// Sign out when the backend rejected the stored token.
    fn expire_session(&mut self, err: &GatewayError) -> Result<()> {
        if self.session.expire_if_unauthorized(&self.store, err)? {
            self.gateway.set_token(None);
            println!("{}", gateway_message(err).yellow());
        }
        Ok(())
    }

    async fn find_movie(&self, movie_id: u64) -> Result<Movie> {
        let movies = self.gateway.movies().await.map_err(|err| gateway_error(&err))?;
        movies
            .into_iter()
            .find(|movie| movie.id == movie_id)
            .ok_or_else(|| anyhow!("Movie {movie_id} not found."))
    }

    fn inventory(&self) -> Result<Box<dyn InventorySource>> {
        let saved: Option<Show> = read_json(&self.store, SHOW_KEY)?;
        Ok(match saved {
            Some(show) => Box::new(show),
            None => Box::new(SyntheticInventory::new(
                self.seed,
                self.config.synthetic_occupancy,
            )),
        })
    }

    fn open_seats(&self) -> Result<SeatScreen> {
        let mut inventory = self.inventory()?;
        SeatScreen::mount(&self.store, &self.config, inventory.as_mut()).map_err(redirect_error)
    }

    fn print_seats(screen: &SeatScreen) -> Result<()> {
        print!("{}", render::draft_summary(screen.draft())?);
        println!();
        print!("{}", render::seat_map(screen.layout())?);
        println!();
        println!("{}", render::selection_summary(screen.selection()).bold());
        Ok(())
    }

    pub async fn movies(&self, search: &str, genre: Option<&str>) -> Result<()> {
        let movies = self.gateway.movies().await.map_err(|err| gateway_error(&err))?;
        println!("{}", "🎬 Now Showing".bright_cyan().bold());
        self.demo_notice();
        let movies = self.enricher.enrich_all(movies).await;
        let matching = filter_movies(&movies, search, genre);
        if matching.is_empty() && !movies.is_empty() {
            println!("No movies match your search.");
            println!("Genres: {}", movie_genres(&movies).join(", "));
        }
        for movie in &matching {
            println!("{}", render::movie_line(movie));
        }
        Ok(())
    }

    pub async fn shows(&self, movie_id: u64) -> Result<()> {
        let movie = self.find_movie(movie_id).await?;
        println!("{}", format!("🎟  Shows for {}", movie.title).bright_cyan().bold());
        if !self.gateway.is_mock() {
            match self.gateway.movie_shows(movie_id).await {
                Ok(shows) if !shows.is_empty() && !self.gateway.is_mock() => {
                    for show in &shows {
                        println!("{}", render::remote_show_line(show));
                    }
                    println!();
                    println!("Book one with `cinebook select {movie_id} --show <id>`.");
                    return Ok(());
                }
                Ok(_) => {}
                Err(err) => log::warn!("shows for movie {movie_id}: {err}"),
            }
        }
        self.demo_notice();
        print!(
            "{}",
            render::slot_table(&demo_theaters(), &show_slots(self.hour, self.seed))?
        );
        println!();
        println!("Book one with `cinebook select {movie_id} --theater <id> --time \"7:00 PM\"`.");
        Ok(())
    }

    pub async fn select_remote(&self, movie_id: u64, show_id: u64) -> Result<()> {
        let movie = self.find_movie(movie_id).await?;
        let shows = self
            .gateway
            .movie_shows(movie_id)
            .await
            .map_err(|err| gateway_error(&err))?;
        if self.gateway.is_mock() {
            bail!("Backend shows are not available in demo mode; use --theater and --time.");
        }
        let show = shows
            .into_iter()
            .find(|show| show.id == show_id)
            .ok_or_else(|| anyhow!("Show {show_id} is not playing {}.", movie.title))?;
        let context = remote_show_context(&movie, &show, DEFAULT_VENUE_SEATS);
        write_json(&self.store, SHOW_KEY, &show)?;
        let draft = select_show(&self.store, context)?;
        println!("{}", "✅ Show selected".green().bold());
        print!("{}", render::draft_summary(&draft)?);
        println!("Next: `cinebook seats` to see the seat map.");
        Ok(())
    }

    pub async fn select_demo(&self, movie_id: u64, theater_id: u32, time: &str) -> Result<()> {
        let movie = self.find_movie(movie_id).await?;
        let theater =
            find_theater(theater_id).ok_or_else(|| anyhow!("Theater {theater_id} not found."))?;
        let slot = show_slots(self.hour, self.seed)
            .into_iter()
            .find(|slot| slot.time.eq_ignore_ascii_case(time.trim()))
            .ok_or_else(|| anyhow!("No {time} show left today at {}.", theater.name))?;
        if !slot.available {
            bail!("The {} show at {} is sold out.", slot.time, theater.name);
        }
        remove(&self.store, SHOW_KEY)?;
        let draft = select_show(&self.store, slot_context(&movie, &theater, &slot))?;
        println!("{}", "✅ Show selected".green().bold());
        print!("{}", render::draft_summary(&draft)?);
        println!("Next: `cinebook seats` to see the seat map.");
        Ok(())
    }

    pub fn seats(&self, count: Option<usize>, clear: bool) -> Result<()> {
        let mut screen = self.open_seats()?;
        if clear {
            screen.clear();
        }
        if let Some(count) = count {
            let applied = screen.set_seat_count(count);
            if applied != count {
                println!("{}", format!("Ticket count adjusted to {applied}.").yellow());
            }
        }
        if clear || count.is_some() {
            screen.save_progress(&self.store)?;
        }
        Self::print_seats(&screen)
    }

    pub fn toggle(&self, seats: &[String]) -> Result<()> {
        let mut screen = self.open_seats()?;
        let ids: Vec<String> = seats.iter().map(|id| id.trim().to_ascii_uppercase()).collect();
        for (id, outcome) in screen.toggle_many(ids.iter().map(String::as_str)) {
            match (outcome, toggle_message(outcome)) {
                (ToggleOutcome::Selected, _) => println!("{} {id}", "+".green()),
                (ToggleOutcome::Deselected, _) => println!("{} {id}", "-".yellow()),
                (_, Some(message)) => println!("{} {id}: {message}", "!".red()),
                (_, None) => {}
            }
        }
        screen.save_progress(&self.store)?;
        Self::print_seats(&screen)
    }

    pub async fn confirm(&self) -> Result<()> {
        let screen = self.open_seats()?;
        let draft = screen.confirm(&self.store, Utc::now())?;
        let saved: Option<Show> = read_json(&self.store, SHOW_KEY)?;
        if let Some(show) = saved.filter(|_| !self.gateway.is_mock()) {
            let seats: Vec<String> = draft.seat_ids().into_iter().map(str::to_string).collect();
            let outcome = self.gateway.book_multiple_seats(show.id, &seats).await;
            match reservation_message(&outcome) {
                Ok(Some(notice)) => println!("{}", notice.yellow()),
                Ok(None) => {}
                Err(problem) => bail!(problem),
            }
        }
        println!("{}", "✅ Seats confirmed".green().bold());
        print!("{}", render::draft_summary(&draft)?);
        println!("Next: `cinebook pay`.");
        Ok(())
    }

    pub async fn pay(&self, wait: bool, email: Option<&str>) -> Result<()> {
        let mut payment =
            PaymentScreen::mount(&self.store, &self.config, Utc::now()).map_err(redirect_error)?;
        println!("{}", "💳 Payment".bright_cyan().bold());
        print!("{}", render::draft_summary(payment.draft())?);
        if !payment.submit() {
            bail!("A payment is already in progress.");
        }
        println!("Processing payment...");
        if wait {
            tokio::time::sleep(payment.processing_delay()).await;
        }
        let booking = payment
            .complete(&self.store, Utc::now())
            .context("Payment failed")?;
        println!("{}", "🎉 Payment Successful!".green().bold());
        println!("Booking {} is confirmed.", booking.booking_id);
        println!("Download it with `cinebook ticket {}`.", booking.booking_id);
        if let Some(raw) = email {
            let result = payment.email_ticket(raw);
            if let Ok(mail) = &result {
                log::info!("emailing ticket to {}: {}", mail.to, mail.subject);
            }
            let message = email_message(&result);
            if result.is_ok() {
                println!("{message}");
            } else {
                println!("{}", message.yellow());
            }
        }
        Ok(())
    }

    pub async fn bookings(&mut self) -> Result<()> {
        enter(&AppRoute::MyBookings, &self.session).map_err(redirect_error)?;
        let ledger = BookingLedger::new(&self.store);
        let overview = load_my_bookings(&self.gateway, &ledger).await?;
        if let Some(err) = &overview.remote_error {
            log::warn!("remote bookings unavailable: {err}");
            self.expire_session(err)?;
        }
        println!("{}", "🎟  My Bookings".bright_cyan().bold());
        self.demo_notice();
        if let Some(notice) = overview.notice() {
            println!("{}", notice.message().yellow());
        }
        for entry in &overview.entries {
            println!();
            print!("{}", render::booking_block(entry)?);
            if entry.is_cancellable() {
                println!("    cancel: `cinebook cancel {}`", entry.booking_id());
            }
        }
        Ok(())
    }

    pub async fn cancel(&mut self, booking_id: &str) -> Result<()> {
        enter(&AppRoute::MyBookings, &self.session).map_err(redirect_error)?;
        let ledger = BookingLedger::new(&self.store);
        let report = cancel_booking(&self.gateway, &ledger, booking_id).await?;
        let message = cancel_message(&report);
        if let Err(err) = &report.remote {
            self.expire_session(err)?;
            if !report.local_updated {
                bail!(message);
            }
        }
        println!("{}", message.green());
        Ok(())
    }

    pub async fn login(
        &mut self,
        username: String,
        password: String,
        email: Option<String>,
    ) -> Result<()> {
        let credentials = Credentials {
            username,
            password,
            email,
        };
        let auth = self
            .gateway
            .login(&credentials)
            .await
            .map_err(|err| gateway_error(&err))?;
        self.session
            .sign_in(&self.store, auth.token, auth.user)
            .context("Could not save your session")?;
        self.gateway.set_token(self.session.token());
        if let Some(user) = self.session.user() {
            println!("{}", format!("Welcome back, {}!", user.username).green().bold());
        }
        if self.gateway.is_mock() {
            println!("{}", "Demo mode: any username and password will do.".yellow());
        }
        Ok(())
    }

    pub async fn signup(&mut self, form: SignupForm) -> Result<()> {
        let request = form.validate().map_err(anyhow::Error::msg)?;
        let auth = self
            .gateway
            .signup(&request)
            .await
            .map_err(|err| gateway_error(&err))?;
        self.session
            .sign_in(&self.store, auth.token, auth.user)
            .context("Could not save your session")?;
        self.gateway.set_token(self.session.token());
        if let Some(user) = self.session.user() {
            println!("{}", format!("Welcome, {}!", user.username).green().bold());
        }
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.session.sign_out(&self.store)?;
        self.gateway.set_token(None);
        println!("Signed out.");
        Ok(())
    }

    pub fn whoami(&self) {
        match self.session.user() {
            Some(user) if user.email.is_empty() => println!("Signed in as {}", user.username),
            Some(user) => println!("Signed in as {} ({})", user.username, user.email),
            None => println!("Not signed in."),
        }
    }

    async fn find_entry(&self, booking_id: &str) -> Result<Option<BookingEntry>> {
        let ledger = BookingLedger::new(&self.store);
        if let Some(local) = ledger
            .load()?
            .into_iter()
            .find(|booking| booking.booking_id == booking_id)
        {
            return Ok(Some(BookingEntry::Local(local)));
        }
        if !self.session.is_authenticated() {
            return Ok(None);
        }
        let overview = load_my_bookings(&self.gateway, &ledger).await?;
        Ok(overview
            .entries
            .into_iter()
            .find(|entry| entry.booking_id() == booking_id))
    }

    pub async fn ticket(&self, booking_id: &str, output: Option<&Path>) -> Result<()> {
        let entry = self
            .find_entry(booking_id)
            .await?
            .ok_or_else(|| anyhow!("Booking {booking_id} not found."))?;
        let ticket = TicketSummary::from_entry(&entry);
        let text = render_ticket_text(&ticket);
        match output {
            Some(path) => {
                let path = if path.is_dir() {
                    path.join(ticket_file_name(&ticket.booking_id))
                } else {
                    path.to_path_buf()
                };
                fs::write(&path, text)
                    .with_context(|| format!("Failed to write ticket to {}", path.display()))?;
                println!("Ticket saved to {}", path.display());
            }
            None => print!("{text}"),
        }
        Ok(())
    }
}
