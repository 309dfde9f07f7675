use anyhow::Result;
use chrono::Datelike;
use grambrandt::card::PostCard;
use grambrandt::config::Config;
use grambrandt::engine::{BatchOutcome, FeedController, FeedSink, PaginationSignal};
use grambrandt::feed::artic::ArticClient;
use grambrandt::feed::types::ArtworkRecord;
use grambrandt::feed::ArtworkSource;
use grambrandt::tui::{
    self,
    state::{AppState, TuiSink},
    TuiCommand,
};
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

/// Stdout sink for `--once`.
struct PrintSink;

impl FeedSink for PrintSink {
    fn show_loading(&mut self) {
        eprintln!("  Loading artworks...");
    }

    fn hide_loading(&mut self) {}

    fn append(&mut self, records: Vec<ArtworkRecord>) {
        let year = chrono::Local::now().year();
        let mut rng = rand::thread_rng();
        for record in &records {
            println!("{}", PostCard::from_record(record, year, &mut rng));
            println!();
        }
    }

    fn clear(&mut self) {}
}

/// Publish the outcome of a load cycle to the activity log.
fn report(state_tx: &watch::Sender<AppState>, seen_count: usize, outcome: &BatchOutcome) {
    state_tx.send_modify(|s| {
        s.seen_count = seen_count;
        match outcome {
            BatchOutcome::Rendered(n) => s.push_log("INFO", format!("loaded {} artworks", n)),
            BatchOutcome::Empty => {
                s.push_log("WARN", "no more artworks match the current filters".to_string())
            }
            BatchOutcome::Failed(reason) => s.push_log("ERROR", format!("fetch failed: {}", reason)),
        }
    });
}

async fn run_once(source: Box<dyn ArtworkSource>, config: &Config) -> Result<()> {
    let mut controller = FeedController::new(
        source,
        PrintSink,
        config.filters.clone(),
        PaginationSignal::new(),
    );
    match controller.load_next().await {
        BatchOutcome::Rendered(n) => {
            eprintln!("  {} artworks", n);
            Ok(())
        }
        BatchOutcome::Empty => {
            println!("No artworks match the current filters.");
            Ok(())
        }
        BatchOutcome::Failed(reason) => anyhow::bail!("fetch failed: {}", reason),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let log_file = std::fs::File::create("grambrandt.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grambrandt=info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    let once = std::env::args().any(|arg| arg == "--once");

    let config = Config::load_or_default(&Config::path_from_env())?;
    let source: Box<dyn ArtworkSource> = Box::new(ArticClient::new(&config.api));

    if once {
        return run_once(source, &config).await;
    }

    let (state_tx, state_rx) = watch::channel(AppState::new(config.filters.clone()));
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<TuiCommand>(16);
    let signal = PaginationSignal::new();

    let mut controller = FeedController::new(
        source,
        TuiSink::new(state_tx.clone()),
        config.filters.clone(),
        signal.clone(),
    );

    let engine = tokio::spawn(async move {
        let outcome = controller.load_next().await;
        report(&state_tx, controller.session().seen_ids().len(), &outcome);

        while let Some(cmd) = cmd_rx.recv().await {
            let outcome = match cmd {
                TuiCommand::LoadMore => Some(controller.load_next().await),
                TuiCommand::ApplyFilters(settings) => {
                    let outcome = controller.apply_filters(settings).await;
                    let active = controller.session().settings.clone();
                    state_tx.send_modify(|s| s.filters = active);
                    outcome
                }
                TuiCommand::Notify { level, message } => {
                    tracing::info!(kind = level, %message, "user action");
                    state_tx.send_modify(|s| s.push_log(level, message));
                    None
                }
                TuiCommand::Quit => break,
            };
            if let Some(outcome) = outcome {
                report(&state_tx, controller.session().seen_ids().len(), &outcome);
            }
        }
    });

    tui::run_tui(state_rx, cmd_tx, signal, config.feed.prefetch_distance).await?;

    engine.abort();
    tracing::debug!("shutting down");
    Ok(())
}
