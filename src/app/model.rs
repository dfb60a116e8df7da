//! Application model types: `App`, `Surface` and `SurfaceState`.
//!
//! Playback state deliberately lives elsewhere (`player::PlaybackSession`);
//! the app model only covers what each surface shows and asks for.

use crate::catalog::{Order, ResultSet};

/// The two screens of the application.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Surface {
    Browse,
    Import,
}

impl Surface {
    pub fn title(self) -> &'static str {
        match self {
            Surface::Browse => "browse",
            Surface::Import => "import",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Surface::Browse => Surface::Import,
            Surface::Import => Surface::Browse,
        }
    }
}

/// Everything one surface shows and asks for: the loaded result page, the
/// cursor, the query and order driving fetches, and fetch bookkeeping.
pub struct SurfaceState {
    pub results: ResultSet,
    pub selected: usize,
    /// Committed search text; what fetches are issued with.
    pub query: String,
    pub order: Order,
    /// Page most recently requested for this surface.
    pub page: usize,
    pub loading: bool,
    /// Bumped per fetch; a response carrying an older value is stale.
    pub fetch_generation: u64,
    pub search_mode: bool,
    /// Text being edited while `search_mode` is on.
    pub search_input: String,
}

impl SurfaceState {
    pub fn new(order: Order) -> Self {
        Self {
            results: ResultSet::default(),
            selected: 0,
            query: String::new(),
            order,
            page: 1,
            loading: false,
            fetch_generation: 0,
            search_mode: false,
            search_input: String::new(),
        }
    }

    /// Note that a fetch for `page` is underway and return the generation
    /// its response must carry to be applied.
    pub fn begin_fetch(&mut self, page: usize) -> u64 {
        self.page = page.max(1);
        self.loading = true;
        self.fetch_generation += 1;
        self.fetch_generation
    }

    /// Install fetched results if `generation` is still current. Returns
    /// whether anything was applied.
    pub fn apply_fetch(&mut self, generation: u64, results: ResultSet) -> bool {
        if generation != self.fetch_generation {
            return false;
        }
        self.loading = false;
        self.results = results;
        if self.selected >= self.results.len() {
            self.selected = 0;
        }
        true
    }

    /// Clear the loading flag for a failed fetch if `generation` is still
    /// current. Returns whether the failure belongs to this surface's
    /// latest request.
    pub fn fetch_failed(&mut self, generation: u64) -> bool {
        if generation != self.fetch_generation {
            return false;
        }
        self.loading = false;
        true
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() && self.selected + 1 < self.results.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        if !self.results.is_empty() {
            self.selected = self.results.len() - 1;
        }
    }

    pub fn selected_track_id(&self) -> Option<&str> {
        self.results.get(self.selected).map(|t| t.id.as_str())
    }

    pub fn enter_search_mode(&mut self) {
        self.search_mode = true;
        self.search_input = self.query.clone();
    }

    /// Leave search mode without touching the committed query.
    pub fn cancel_search(&mut self) {
        self.search_mode = false;
        self.search_input.clear();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
    }

    /// Leave search mode and adopt the edited text as the committed query.
    pub fn commit_search(&mut self) -> String {
        self.search_mode = false;
        self.query = self.search_input.trim().to_string();
        self.search_input.clear();
        self.query.clone()
    }

    pub fn cycle_order(&mut self) {
        self.order = self.order.next();
    }
}

/// The main application model: two independent surfaces, one active.
pub struct App {
    pub active: Surface,
    pub browse: SurfaceState,
    pub import: SurfaceState,
}

impl App {
    pub fn new(default_order: Order) -> Self {
        Self {
            active: Surface::Browse,
            browse: SurfaceState::new(default_order),
            import: SurfaceState::new(default_order),
        }
    }

    pub fn switch_surface(&mut self) {
        self.active = self.active.other();
    }

    pub fn state(&self, surface: Surface) -> &SurfaceState {
        match surface {
            Surface::Browse => &self.browse,
            Surface::Import => &self.import,
        }
    }

    pub fn state_mut(&mut self, surface: Surface) -> &mut SurfaceState {
        match surface {
            Surface::Browse => &mut self.browse,
            Surface::Import => &mut self.import,
        }
    }

    pub fn active_state(&self) -> &SurfaceState {
        self.state(self.active)
    }

    pub fn active_state_mut(&mut self) -> &mut SurfaceState {
        self.state_mut(self.active)
    }

    pub fn in_search_mode(&self) -> bool {
        self.active_state().search_mode
    }
}
