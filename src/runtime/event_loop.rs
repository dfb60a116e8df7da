use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::catalog::CatalogClient;
use crate::config;
use crate::player::{AudioBackend, Notice, PlaybackPhase, PlayerController, Severity};
use crate::runtime::fetch::{self, FetchResult};
use crate::store::{ImportOutcome, SongLibrary};
use crate::ui;
use crate::view;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Dirty flags shared with the controller's render hooks; a set flag
    /// means the next turn must repaint.
    pub browse_dirty: Rc<Cell<bool>>,
    pub import_dirty: Rc<Cell<bool>>,
    /// Latest notice shown in the status box, shared with the notice sink.
    pub notice: Rc<RefCell<Option<Notice>>>,
}

impl EventLoopState {
    pub fn new(
        browse_dirty: Rc<Cell<bool>>,
        import_dirty: Rc<Cell<bool>>,
        notice: Rc<RefCell<Option<Notice>>>,
    ) -> Self {
        Self {
            pending_gg: false,
            browse_dirty,
            import_dirty,
            notice,
        }
    }

    fn mark_dirty(&self) {
        self.browse_dirty.set(true);
        self.import_dirty.set(true);
    }

    fn set_notice(&self, notice: Notice) {
        *self.notice.borrow_mut() = Some(notice);
        self.mark_dirty();
    }
}

/// Main terminal event loop: polls the playback engine, installs finished
/// fetches, repaints when something changed and handles input. Returns
/// `Ok(())` when shutdown is requested.
pub fn run<B: AudioBackend>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlayerController<B>,
    client: &CatalogClient,
    library: &mut SongLibrary,
    fetch_tx: &mpsc::Sender<FetchResult>,
    fetch_rx: &mpsc::Receiver<FetchResult>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Let the playback engine process whatever arrived since last turn.
        controller.poll();

        while let Ok(result) = fetch_rx.try_recv() {
            apply_fetch_result(app, state, result);
        }

        if state.browse_dirty.get() || state.import_dirty.get() {
            state.browse_dirty.set(false);
            state.import_dirty.set(false);

            let session = controller.session();
            let rows = view::track_rows(&app.active_state().results, session, library);
            let notice = state.notice.borrow();
            terminal.draw(|f| {
                ui::draw(
                    f,
                    app,
                    session,
                    &rows,
                    library.len(),
                    notice.as_ref(),
                    &settings.ui,
                )
            })?;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, controller, client, library, fetch_tx, state)?
                {
                    break;
                }
            }
        }
    }

    // Leaving the loop means quitting; silence the audio before teardown.
    controller.stop();
    Ok(())
}

/// Install one finished fetch. Responses from superseded requests fall on
/// the floor, exactly like stale playback events.
fn apply_fetch_result(app: &mut App, state: &mut EventLoopState, result: FetchResult) {
    let surface_state = app.state_mut(result.surface);
    match result.outcome {
        Ok(results) => {
            if surface_state.apply_fetch(result.generation, results) {
                state.mark_dirty();
            }
        }
        Err(e) => {
            if surface_state.fetch_failed(result.generation) {
                state.set_notice(Notice::new(Severity::Error, format!("Fetch failed: {e}")));
            }
        }
    }
}

fn handle_key_event<B: AudioBackend>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut PlayerController<B>,
    client: &CatalogClient,
    library: &mut SongLibrary,
    fetch_tx: &mpsc::Sender<FetchResult>,
    state: &mut EventLoopState,
) -> Result<bool, Box<dyn std::error::Error>> {
    if app.in_search_mode() {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => {
                app.active_state_mut().cancel_search();
                state.mark_dirty();
            }
            KeyCode::Backspace => {
                app.active_state_mut().pop_search_char();
                state.mark_dirty();
            }
            KeyCode::Enter => {
                let surface = app.active;
                let surface_state = app.active_state_mut();
                surface_state.commit_search();
                fetch::request_fetch(
                    surface_state,
                    client,
                    fetch_tx,
                    surface,
                    1,
                    settings.catalog.page_size,
                );
                state.mark_dirty();
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.active_state_mut().push_search_char(c);
                    state.mark_dirty();
                }
            }
            _ => {}
        }

        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            return Ok(true);
        }
        KeyCode::Tab | KeyCode::BackTab => {
            state.pending_gg = false;
            app.switch_surface();
            state.mark_dirty();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.active_state_mut().select_next();
            state.mark_dirty();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.active_state_mut().select_prev();
            state.mark_dirty();
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.active_state_mut().select_first();
                state.mark_dirty();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.active_state_mut().select_last();
            state.mark_dirty();
        }
        KeyCode::Enter => {
            state.pending_gg = false;
            let surface_state = app.active_state();
            if let Some(id) = surface_state.selected_track_id() {
                let id = id.to_string();
                controller.play(&surface_state.results, &id);
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            state.pending_gg = false;
            toggle_session(app, controller);
        }
        KeyCode::Char('x') => {
            state.pending_gg = false;
            controller.stop();
        }
        KeyCode::Char('h') | KeyCode::Left => {
            state.pending_gg = false;
            let surface = app.active;
            let surface_state = app.active_state_mut();
            if surface_state.results.has_prev() {
                let page = surface_state.results.page() - 1;
                fetch::request_fetch(
                    surface_state,
                    client,
                    fetch_tx,
                    surface,
                    page,
                    settings.catalog.page_size,
                );
                state.mark_dirty();
            }
        }
        KeyCode::Char('l') | KeyCode::Right => {
            state.pending_gg = false;
            let surface = app.active;
            let surface_state = app.active_state_mut();
            if surface_state.results.may_have_next() {
                let page = surface_state.results.page() + 1;
                fetch::request_fetch(
                    surface_state,
                    client,
                    fetch_tx,
                    surface,
                    page,
                    settings.catalog.page_size,
                );
                state.mark_dirty();
            }
        }
        KeyCode::Char('/') => {
            state.pending_gg = false;
            app.active_state_mut().enter_search_mode();
            state.mark_dirty();
        }
        KeyCode::Char('o') => {
            state.pending_gg = false;
            let surface = app.active;
            let surface_state = app.active_state_mut();
            surface_state.cycle_order();
            fetch::request_fetch(
                surface_state,
                client,
                fetch_tx,
                surface,
                1,
                settings.catalog.page_size,
            );
            state.mark_dirty();
        }
        KeyCode::Char('i') => {
            state.pending_gg = false;
            import_selected(app, library, state);
        }
        KeyCode::Char('R') => {
            state.pending_gg = false;
            let surface = app.active;
            let surface_state = app.active_state_mut();
            let page = surface_state.results.page();
            fetch::request_fetch(
                surface_state,
                client,
                fetch_tx,
                surface,
                page,
                settings.catalog.page_size,
            );
            state.mark_dirty();
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    Ok(false)
}

/// Space/p: toggle whatever the session is doing; start the selection when
/// nothing is loaded.
fn toggle_session<B: AudioBackend>(app: &App, controller: &mut PlayerController<B>) {
    match controller.session().phase() {
        PlaybackPhase::Playing => controller.pause(),
        PlaybackPhase::Paused => controller.resume(),
        // A start is already pending.
        PlaybackPhase::Loading => {}
        PlaybackPhase::Idle => {
            let surface_state = app.active_state();
            if let Some(id) = surface_state.selected_track_id() {
                let id = id.to_string();
                controller.play(&surface_state.results, &id);
            }
        }
    }
}

fn import_selected(app: &App, library: &mut SongLibrary, state: &mut EventLoopState) {
    let surface_state = app.active_state();
    let Some(track) = surface_state.results.get(surface_state.selected) else {
        return;
    };

    match library.import(track) {
        Ok(ImportOutcome::Added) => {
            state.set_notice(Notice::new(
                Severity::Success,
                format!("Imported: {}", track.display()),
            ));
        }
        Ok(ImportOutcome::Duplicate) => {
            state.set_notice(Notice::new(
                Severity::Info,
                format!("Already in library: {}", track.display()),
            ));
        }
        Err(e) => {
            state.set_notice(Notice::new(Severity::Error, format!("Import failed: {e}")));
        }
    }
}
