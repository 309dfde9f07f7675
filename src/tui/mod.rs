pub mod config_view;
pub mod render;
pub mod state;

use crate::engine::pagination::PaginationSignal;
use crate::feed::filter::FilterSettings;
use anyhow::Result;
use config_view::ConfigViewState;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use state::{AppState, Modal, ViewState};
use std::io::stdout;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Commands the TUI sends to the engine task.
#[derive(Debug, Clone, PartialEq)]
pub enum TuiCommand {
    /// Pagination fired; fetch the next page.
    LoadMore,
    /// Config modal closed with these settings.
    ApplyFilters(FilterSettings),
    /// Surface a message in the activity log.
    Notify { level: &'static str, message: String },
    Quit,
}

/// Run the TUI. Reads state from `state_rx`, sends commands on `cmd_tx`, and
/// fires `signal` when the cursor nears the end of the feed.
pub async fn run_tui(
    state_rx: watch::Receiver<AppState>,
    cmd_tx: mpsc::Sender<TuiCommand>,
    signal: PaginationSignal,
    prefetch_distance: usize,
) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, state_rx, cmd_tx, signal, prefetch_distance).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut state_rx: watch::Receiver<AppState>,
    cmd_tx: mpsc::Sender<TuiCommand>,
    signal: PaginationSignal,
    prefetch_distance: usize,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(Duration::from_millis(100));
    let mut view = ViewState::default();
    let mut spinner_frame: u8 = 0;

    loop {
        {
            let state = state_rx.borrow();
            view.clamp(state.posts.len());
            terminal.draw(|f| render::draw(f, &state, &view, spinner_frame))?;
        }

        tokio::select! {
            _ = tick.tick() => {
                spinner_frame = spinner_frame.wrapping_add(1);
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            maybe_event = events.next() => {
                let Some(event) = maybe_event else { return Ok(()) };
                let Event::Key(key) = event? else { continue };
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                let commands = {
                    let state = state_rx.borrow();
                    let mut commands = handle_key(&mut view, &state, key);
                    if commands.is_empty()
                        && view.modal.is_none()
                        && view.near_end(state.posts.len(), prefetch_distance)
                        && signal.try_fire()
                    {
                        commands.push(TuiCommand::LoadMore);
                    }
                    commands
                };

                for cmd in commands {
                    let quit = cmd == TuiCommand::Quit;
                    let _ = cmd_tx.send(cmd).await;
                    if quit {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Apply one key press to the view. Returns commands for the engine.
pub fn handle_key(view: &mut ViewState, state: &AppState, key: KeyEvent) -> Vec<TuiCommand> {
    match view.modal.take() {
        Some(Modal::Config(cv)) => return handle_config_key(view, cv, key),
        Some(Modal::Details { .. }) => {
            // Any key closes the details modal.
            return Vec::new();
        }
        None => {}
    }

    let len = state.posts.len();
    let selected = state.posts.get(view.selected);

    match key.code {
        KeyCode::Char('q') => vec![TuiCommand::Quit],
        KeyCode::Char('j') | KeyCode::Down => {
            view.move_down(len);
            Vec::new()
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view.move_up();
            Vec::new()
        }
        KeyCode::Char('g') | KeyCode::Home => {
            view.selected = 0;
            Vec::new()
        }
        KeyCode::Char('G') | KeyCode::End => {
            view.jump_to_end(len);
            Vec::new()
        }
        KeyCode::Char('l') => {
            if let Some(card) = selected {
                view.toggle_like(card.id);
            }
            vec![]
        }
        KeyCode::Char('s') => match selected {
            Some(card) => vec![TuiCommand::Notify {
                level: "SHARE",
                message: card.share_text(),
            }],
            None => vec![],
        },
        KeyCode::Char('i') => {
            if let Some(card) = selected {
                view.modal = Some(Modal::Details {
                    title: format!("\"{}\" by {}", card.title, card.artist_name),
                    links: card.detail_links(),
                });
            }
            vec![]
        }
        KeyCode::Char('c') => {
            view.modal = Some(Modal::Config(ConfigViewState::new(state.filters.clone())));
            vec![]
        }
        _ => vec![],
    }
}

fn handle_config_key(view: &mut ViewState, mut cv: ConfigViewState, key: KeyEvent) -> Vec<TuiCommand> {
    if cv.editing {
        match key.code {
            KeyCode::Enter => cv.commit_edit(),
            KeyCode::Esc => cv.cancel_edit(),
            KeyCode::Backspace => cv.backspace(),
            KeyCode::Char(c) => cv.push_char(c),
            _ => {}
        }
        view.modal = Some(Modal::Config(cv));
        return vec![];
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('c') | KeyCode::Char('q') => {
            return vec![TuiCommand::ApplyFilters(cv.draft)];
        }
        KeyCode::Down | KeyCode::Char('j') => cv.next(),
        KeyCode::Up | KeyCode::Char('k') => cv.prev(),
        KeyCode::Enter | KeyCode::Char(' ') => cv.activate(),
        _ => {}
    }
    view.modal = Some(Modal::Config(cv));
    vec![]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::PostCard;
    use crate::feed::filter::PHOTOGRAPH;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state_with_posts(n: u64) -> AppState {
        let mut state = AppState::new(FilterSettings::default());
        for id in 0..n {
            state.posts.push(PostCard {
                id,
                username: "gseurat".to_string(),
                avatar_initials: "GS".to_string(),
                avatar_hue: 0,
                artist_name: "Georges Seurat".to_string(),
                artist_url: None,
                place_of_origin: "France".to_string(),
                title: format!("Study {}", id),
                caption: "oil on canvas.".to_string(),
                years_ago: None,
                image_url: None,
                detail_url: format!("https://www.artic.edu/artworks/{}", id),
                likes: 100,
                comments: 10,
                shares: 10,
            });
        }
        state
    }

    #[test]
    fn test_navigation_and_quit() {
        let state = state_with_posts(3);
        let mut view = ViewState::default();
        assert!(handle_key(&mut view, &state, press(KeyCode::Char('j'))).is_empty());
        assert_eq!(view.selected, 1);
        handle_key(&mut view, &state, press(KeyCode::Char('G')));
        assert_eq!(view.selected, 2);
        assert_eq!(
            handle_key(&mut view, &state, press(KeyCode::Char('q'))),
            vec![TuiCommand::Quit]
        );
    }

    #[test]
    fn test_like_and_share_selected_card() {
        let state = state_with_posts(2);
        let mut view = ViewState::default();
        handle_key(&mut view, &state, press(KeyCode::Char('l')));
        assert!(view.liked.contains(&0));

        let cmds = handle_key(&mut view, &state, press(KeyCode::Char('s')));
        match &cmds[..] {
            [TuiCommand::Notify { level, message }] => {
                assert_eq!(*level, "SHARE");
                assert!(message.contains("\"Study 0\" by Georges Seurat"));
            }
            other => panic!("unexpected commands: {:?}", other),
        }
    }

    #[test]
    fn test_details_modal_opens_and_closes() {
        let state = state_with_posts(1);
        let mut view = ViewState::default();
        handle_key(&mut view, &state, press(KeyCode::Char('i')));
        assert!(matches!(view.modal, Some(Modal::Details { .. })));
        handle_key(&mut view, &state, press(KeyCode::Char('x')));
        assert!(view.modal.is_none());
    }

    #[test]
    fn test_config_modal_applies_draft_on_close() {
        let state = state_with_posts(1);
        let mut view = ViewState::default();
        handle_key(&mut view, &state, press(KeyCode::Char('c')));
        handle_key(&mut view, &state, press(KeyCode::Down));
        handle_key(&mut view, &state, press(KeyCode::Char(' ')));

        let cmds = handle_key(&mut view, &state, press(KeyCode::Esc));
        assert!(view.modal.is_none());
        match &cmds[..] {
            [TuiCommand::ApplyFilters(settings)] => assert!(settings.includes_type(PHOTOGRAPH)),
            other => panic!("unexpected commands: {:?}", other),
        }
    }

    #[test]
    fn test_config_edit_swallows_keys() {
        let state = state_with_posts(1);
        let mut view = ViewState::default();
        handle_key(&mut view, &state, press(KeyCode::Char('c')));
        for _ in 0..5 {
            handle_key(&mut view, &state, press(KeyCode::Down));
        }
        handle_key(&mut view, &state, press(KeyCode::Enter));
        // 'q' and 'c' while editing are not digits and must not close the modal
        assert!(handle_key(&mut view, &state, press(KeyCode::Char('q'))).is_empty());
        for c in "1900".chars() {
            handle_key(&mut view, &state, press(KeyCode::Char(c)));
        }
        handle_key(&mut view, &state, press(KeyCode::Enter));

        let cmds = handle_key(&mut view, &state, press(KeyCode::Char('c')));
        match &cmds[..] {
            [TuiCommand::ApplyFilters(settings)] => assert_eq!(settings.max_year, Some(1900)),
            other => panic!("unexpected commands: {:?}", other),
        }
    }
}
