use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Surface};
use crate::catalog::CatalogClient;
use crate::config;
use crate::player::{self, Notice, PlayerController, RodioBackend, Severity};
use crate::store::SongLibrary;

mod event_loop;
mod fetch;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let library_path = settings
        .library
        .path
        .clone()
        .or_else(config::default_library_path)
        .unwrap_or_else(|| PathBuf::from("songs.json"));
    // A library that exists but does not parse is fatal: starting with an
    // empty one would overwrite it on the next import.
    let mut library = SongLibrary::open(&library_path)?;

    let client = CatalogClient::new(&settings.catalog)?;

    // Main-thread-only render plumbing. The controller and the event loop
    // share these; cross-thread traffic stays on the mpsc channels.
    let notice: Rc<RefCell<Option<Notice>>> = Rc::new(RefCell::new(None));
    let browse_dirty = Rc::new(Cell::new(true));
    let import_dirty = Rc::new(Cell::new(true));

    let (signal_tx, signal_rx) = player::signal_channel();
    let backend = RodioBackend::new(signal_tx.clone(), settings.player.volume);

    let notice_sink = {
        let notice = Rc::clone(&notice);
        let browse_dirty = Rc::clone(&browse_dirty);
        let import_dirty = Rc::clone(&import_dirty);
        Box::new(move |n: Notice| {
            *notice.borrow_mut() = Some(n);
            browse_dirty.set(true);
            import_dirty.set(true);
        })
    };

    let mut controller = PlayerController::new(
        backend,
        signal_tx,
        signal_rx,
        Duration::from_millis(settings.player.tick_interval_ms),
        notice_sink,
    );
    {
        let browse_dirty = Rc::clone(&browse_dirty);
        controller.add_render_hook(Box::new(move || browse_dirty.set(true)));
        let import_dirty = Rc::clone(&import_dirty);
        controller.add_render_hook(Box::new(move || import_dirty.set(true)));
    }

    let mut app = App::new(settings.catalog.default_order.into());

    let (fetch_tx, fetch_rx) = mpsc::channel::<fetch::FetchResult>();
    if client.has_client_id() {
        fetch::request_fetch(
            &mut app.browse,
            &client,
            &fetch_tx,
            Surface::Browse,
            1,
            settings.catalog.page_size,
        );
        fetch::request_fetch(
            &mut app.import,
            &client,
            &fetch_tx,
            Surface::Import,
            1,
            settings.catalog.page_size,
        );
    } else {
        *notice.borrow_mut() = Some(Notice::new(
            Severity::Warning,
            "No catalog.client_id configured; fetching is disabled",
        ));
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(browse_dirty, import_dirty, notice);

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &mut controller,
            &client,
            &mut library,
            &fetch_tx,
            &fetch_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
