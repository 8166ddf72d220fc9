// TUI application state
//
// The universe never changes once loaded. Every interaction mutates
// `criteria` and calls `refresh`, which reruns the whole filter pipeline.
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ratatui::widgets::ListState;
use sponsorscout_core::{
    compute_bounds, config::UiConfig, suggest, topic_frequency, FacetBounds, FilterCriteria,
    FilterEngine, FuzzyOptions, Listing, TopicCount, TopicSuggestion,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,       // Browsing cards
    Searching,    // Typing in search box
    Filtering,    // Moving around the sidebar
    PickingTopic, // Typing in the topic picker
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarField {
    Readme,
    Website,
    MaxPrice,
    MinStars,
    MaxStars,
    Topics,
}

impl SidebarField {
    pub const ALL: [SidebarField; 6] = [
        SidebarField::Readme,
        SidebarField::Website,
        SidebarField::MaxPrice,
        SidebarField::MinStars,
        SidebarField::MaxStars,
        SidebarField::Topics,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1).min(Self::ALL.len() - 1)]
    }

    pub fn previous(self) -> Self {
        Self::ALL[self.position().saturating_sub(1)]
    }
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub universe: Vec<Listing>,
    /// Facet bounds of the universe, slider limits come from here
    pub bounds: FacetBounds,
    pub topic_index: Vec<TopicCount>,
    pub criteria: FilterCriteria,
    /// Positions in `universe`, in display order
    pub results: Vec<usize>,
    pub selected_index: usize,
    pub list_state: ListState,
    pub sidebar_field: SidebarField,
    pub topic_input: String,
    pub topic_cursor: usize,
    pub status_message: Option<String>,
    engine: FilterEngine,
    name_matcher: SkimMatcherV2,
    suggestion_limit: usize,
    slider_steps: u32,
}

impl App {
    pub fn new(universe: Vec<Listing>, search: FuzzyOptions, ui: &UiConfig) -> Self {
        let bounds = compute_bounds(&universe);
        let topic_index = topic_frequency(&universe);

        let mut app = Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            universe,
            bounds,
            topic_index,
            criteria: FilterCriteria::seeded(&bounds),
            results: Vec::new(),
            selected_index: 0,
            list_state: ListState::default(),
            sidebar_field: SidebarField::Readme,
            topic_input: String::new(),
            topic_cursor: 0,
            status_message: None,
            engine: FilterEngine::new(search),
            name_matcher: SkimMatcherV2::default(),
            suggestion_limit: ui.suggestion_limit,
            slider_steps: ui.slider_steps.max(1),
        };
        app.refresh();
        app
    }

    /// Rerun the filter pipeline after any criteria change
    pub fn refresh(&mut self) {
        self.results = self.engine.filter_indices(&self.universe, &self.criteria);

        if self.results.is_empty() {
            self.selected_index = 0;
            self.list_state.select(None);
        } else {
            self.selected_index = self.selected_index.min(self.results.len() - 1);
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Searching;
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn enter_filter_mode(&mut self) {
        self.input_mode = InputMode::Filtering;
    }

    pub fn enter_topic_mode(&mut self) {
        self.input_mode = InputMode::PickingTopic;
        self.topic_cursor = 0;
    }

    pub fn leave_topic_mode(&mut self) {
        self.topic_input.clear();
        self.topic_cursor = 0;
        self.input_mode = InputMode::Filtering;
    }

    // --- results -----------------------------------------------------------

    pub fn result_listings(&self) -> impl Iterator<Item = &Listing> {
        self.results.iter().map(|&i| &self.universe[i])
    }

    pub fn selected_listing(&self) -> Option<&Listing> {
        self.results
            .get(self.selected_index)
            .map(|&i| &self.universe[i])
    }

    pub fn next_result(&mut self) {
        if !self.results.is_empty() {
            self.selected_index = (self.selected_index + 1).min(self.results.len() - 1);
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn previous_result(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    /// Clicking a topic badge: toggle the selected card's first topic
    pub fn toggle_selected_topic(&mut self) {
        let Some(topic) = self
            .selected_listing()
            .and_then(|l| l.repository.topics.first())
            .cloned()
        else {
            return;
        };

        self.criteria.toggle_tag(&topic);
        self.refresh();
    }

    pub fn reset_filters(&mut self) {
        self.criteria.reset(&self.bounds);
        self.topic_input.clear();
        self.selected_index = 0;
        self.status_message = Some("Filters reset".to_string());
        self.refresh();
    }

    // --- search box --------------------------------------------------------

    pub fn push_query_char(&mut self, c: char) {
        self.criteria.query.push(c);
        self.refresh();
    }

    pub fn pop_query_char(&mut self) {
        self.criteria.query.pop();
        self.refresh();
    }

    /// Repository names for the autocomplete row, best fuzzy match first
    pub fn name_suggestions(&self) -> Vec<&str> {
        let query = self.criteria.query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(i64, &str)> = self
            .universe
            .iter()
            .filter_map(|l| {
                let name = l.repository.full_name.as_str();
                self.name_matcher.fuzzy_match(name, query).map(|score| (score, name))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .map(|(_, name)| name)
            .filter(|name| *name != query)
            .take(self.suggestion_limit)
            .collect()
    }

    /// Replace the query with the top suggestion
    pub fn accept_suggestion(&mut self) {
        if let Some(name) = self.name_suggestions().first().map(|s| s.to_string()) {
            self.criteria.query = name;
            self.refresh();
        }
    }

    // --- sidebar -----------------------------------------------------------

    pub fn next_field(&mut self) {
        self.sidebar_field = self.sidebar_field.next();
    }

    pub fn previous_field(&mut self) {
        self.sidebar_field = self.sidebar_field.previous();
    }

    /// Space/Enter on the current sidebar field
    pub fn activate_field(&mut self) {
        match self.sidebar_field {
            SidebarField::Readme => {
                self.criteria.placement.readme = !self.criteria.placement.readme;
                self.refresh();
            }
            SidebarField::Website => {
                self.criteria.placement.website = !self.criteria.placement.website;
                self.refresh();
            }
            SidebarField::Topics => self.enter_topic_mode(),
            _ => {}
        }
    }

    /// Move the current slider one step right (`up = true`) or left
    pub fn nudge_field(&mut self, up: bool) {
        match self.sidebar_field {
            SidebarField::MaxPrice => self.nudge_price(up),
            SidebarField::MinStars => self.nudge_min_stars(up),
            SidebarField::MaxStars => self.nudge_max_stars(up),
            SidebarField::Readme | SidebarField::Website => self.activate_field(),
            SidebarField::Topics => {}
        }
    }

    fn price_step(&self) -> f64 {
        let span = self.bounds.price.max - self.bounds.price.min;
        (span / f64::from(self.slider_steps)).max(1.0)
    }

    fn star_step(&self) -> u64 {
        let span = self.bounds.stars.max - self.bounds.stars.min;
        (span / u64::from(self.slider_steps)).max(1)
    }

    fn nudge_price(&mut self, up: bool) {
        if self.bounds.price.is_empty() {
            return;
        }

        let step = self.price_step();
        let current = self.criteria.max_price;
        let next = if up { current + step } else { current - step };
        self.criteria.max_price = self.bounds.price.clamp(next);
        self.refresh();
    }

    fn nudge_min_stars(&mut self, up: bool) {
        if self.bounds.stars.is_empty() {
            return;
        }

        let step = self.star_step();
        let current = self.criteria.min_stars;
        let next = if up {
            current.saturating_add(step).min(self.criteria.max_stars)
        } else {
            current.saturating_sub(step)
        };
        self.criteria.min_stars = self.bounds.stars.clamp(next);
        self.refresh();
    }

    fn nudge_max_stars(&mut self, up: bool) {
        if self.bounds.stars.is_empty() {
            return;
        }

        let step = self.star_step();
        let current = self.criteria.max_stars;
        let next = if up {
            current.saturating_add(step)
        } else {
            current.saturating_sub(step).max(self.criteria.min_stars)
        };
        self.criteria.max_stars = self.bounds.stars.clamp(next);
        self.refresh();
    }

    // --- topic picker ------------------------------------------------------

    pub fn topic_suggestions(&self) -> Vec<TopicSuggestion<'_>> {
        suggest(&self.topic_index, &self.topic_input, &self.criteria)
    }

    pub fn push_topic_char(&mut self, c: char) {
        self.topic_input.push(c);
        self.topic_cursor = 0;
    }

    /// Backspace: edit the input, or drop the last tag when it's already empty
    pub fn topic_backspace(&mut self) {
        if self.topic_input.pop().is_none() && self.criteria.pop_tag().is_some() {
            self.refresh();
        }
        self.topic_cursor = 0;
    }

    pub fn next_topic(&mut self) {
        let count = self.topic_suggestions().len();
        if count > 0 {
            self.topic_cursor = (self.topic_cursor + 1).min(count - 1);
        }
    }

    pub fn previous_topic(&mut self) {
        self.topic_cursor = self.topic_cursor.saturating_sub(1);
    }

    /// Toggle the highlighted topic in the tag filter
    pub fn select_topic(&mut self) {
        let Some(topic) = self
            .topic_suggestions()
            .get(self.topic_cursor)
            .map(|s| s.topic.to_string())
        else {
            return;
        };

        self.criteria.toggle_tag(&topic);
        self.refresh();
    }

    pub fn summary(&self) -> String {
        format!("Showing {} of {}", self.results.len(), self.universe.len())
    }
}
