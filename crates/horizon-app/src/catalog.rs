// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::{debug, info, warn};

use crate::{FILTER_ALL, Project, ProjectId, RemoteFailure};

/// Reason shown in the "unable to load" panel. Transport and protocol
/// failures are not told apart for the user.
pub const UNAVAILABLE_REASON: &str =
    "The project service is unavailable right now. Check that the backend is running, then try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded(Vec<Project>),
    Failed { reason: String },
}

impl LoadState {
    /// The held collection; empty while loading or after a failure.
    pub fn projects(&self) -> &[Project] {
        match self {
            Self::Loaded(items) => items,
            Self::Loading | Self::Failed { .. } => &[],
        }
    }
}

/// Epoch of one load cycle. Only the newest ticket may settle the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub const fn epoch(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadResolution {
    Applied,
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionLoader {
    state: LoadState,
    epoch: u64,
}

impl Default for CollectionLoader {
    fn default() -> Self {
        Self {
            state: LoadState::Loading,
            epoch: 0,
        }
    }
}

impl CollectionLoader {
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Enters `Loading` and hands out the ticket the caller must resolve with.
    pub fn begin(&mut self) -> LoadTicket {
        self.epoch = self.epoch.saturating_add(1);
        self.state = LoadState::Loading;
        debug!(epoch = self.epoch, "collection load started");
        LoadTicket(self.epoch)
    }

    pub fn resolve(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Project>, RemoteFailure>,
    ) -> LoadResolution {
        if ticket.0 != self.epoch || self.state != LoadState::Loading {
            debug!(
                epoch = ticket.0,
                current = self.epoch,
                "discarding stale collection response"
            );
            return LoadResolution::Stale;
        }

        self.state = match result {
            Ok(items) => {
                info!(epoch = ticket.0, count = items.len(), "collection loaded");
                LoadState::Loaded(items)
            }
            Err(failure) => {
                warn!(epoch = ticket.0, kind = failure.kind(), %failure, "collection load failed");
                LoadState::Failed {
                    reason: UNAVAILABLE_REASON.to_owned(),
                }
            }
        };
        LoadResolution::Applied
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFilters {
    pub category: String,
    pub status: String,
}

impl Default for CatalogFilters {
    fn default() -> Self {
        Self {
            category: FILTER_ALL.to_owned(),
            status: FILTER_ALL.to_owned(),
        }
    }
}

impl CatalogFilters {
    pub fn new(category: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            status: status.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.category != FILTER_ALL || self.status != FILTER_ALL
    }

    pub fn matches(&self, project: &Project) -> bool {
        axis_matches(&self.category, &project.category)
            && axis_matches(&self.status, &project.status)
    }

    pub fn apply<'a>(&self, collection: &'a [Project]) -> Vec<&'a Project> {
        collection
            .iter()
            .filter(|project| self.matches(project))
            .collect()
    }
}

fn axis_matches(filter: &str, value: &str) -> bool {
    filter == FILTER_ALL || filter == value
}

/// Stable, non-destructive projection of `collection` onto both filter axes.
pub fn filter_projects<'a>(
    collection: &'a [Project],
    category: &str,
    status: &str,
) -> Vec<&'a Project> {
    CatalogFilters::new(category, status).apply(collection)
}

/// Steps through a fixed option list; unknown values restart at the first option.
pub fn cycle_option(options: &[&str], current: &str, delta: isize) -> String {
    if options.is_empty() {
        return current.to_owned();
    }
    let len = options.len() as isize;
    let next = match options.iter().position(|option| *option == current) {
        Some(index) => (index as isize + delta).rem_euclid(len) as usize,
        None => 0,
    };
    options[next].to_owned()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    Closed,
    Open(ProjectId),
}

/// What the catalog screen should show right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogDisplay<'a> {
    Loading,
    Failed { reason: &'a str },
    Empty,
    Items(Vec<&'a Project>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCommand {
    SetCategory(String),
    SetStatus(String),
    ClearCategory,
    ClearStatus,
    ClearFilters,
    Inspect(ProjectId),
    CloseOverlay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    FiltersChanged(CatalogFilters),
    OverlayOpened(ProjectId),
    OverlayClosed,
    LoadStarted(LoadTicket),
    Loaded { count: usize },
    LoadFailed { reason: String },
    StaleResponseDiscarded(LoadTicket),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogView {
    loader: CollectionLoader,
    filters: CatalogFilters,
    overlay: Overlay,
}

impl CatalogView {
    pub fn load_state(&self) -> &LoadState {
        self.loader.state()
    }

    pub fn filters(&self) -> &CatalogFilters {
        &self.filters
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn collection(&self) -> &[Project] {
        self.loader.state().projects()
    }

    pub fn visible(&self) -> Vec<&Project> {
        self.filters.apply(self.collection())
    }

    pub fn display(&self) -> CatalogDisplay<'_> {
        match self.loader.state() {
            LoadState::Loading => CatalogDisplay::Loading,
            LoadState::Failed { reason } => CatalogDisplay::Failed { reason },
            LoadState::Loaded(items) => {
                let visible = self.filters.apply(items);
                if visible.is_empty() {
                    CatalogDisplay::Empty
                } else {
                    CatalogDisplay::Items(visible)
                }
            }
        }
    }

    /// The project behind the open overlay.
    pub fn inspected(&self) -> Option<&Project> {
        let Overlay::Open(id) = &self.overlay else {
            return None;
        };
        self.collection().iter().find(|project| &project.id == id)
    }

    /// Starts a load cycle (initial mount or retry). Any open overlay is
    /// dropped so it cannot outlive the collection it points into.
    pub fn begin_load(&mut self) -> (LoadTicket, Vec<CatalogEvent>) {
        let mut events = Vec::new();
        if self.overlay != Overlay::Closed {
            self.overlay = Overlay::Closed;
            events.push(CatalogEvent::OverlayClosed);
        }
        let ticket = self.loader.begin();
        events.push(CatalogEvent::LoadStarted(ticket));
        (ticket, events)
    }

    pub fn resolve_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Project>, RemoteFailure>,
    ) -> Vec<CatalogEvent> {
        match self.loader.resolve(ticket, result) {
            LoadResolution::Stale => vec![CatalogEvent::StaleResponseDiscarded(ticket)],
            LoadResolution::Applied => match self.loader.state() {
                LoadState::Loaded(items) => vec![CatalogEvent::Loaded { count: items.len() }],
                LoadState::Failed { reason } => vec![CatalogEvent::LoadFailed {
                    reason: reason.clone(),
                }],
                LoadState::Loading => Vec::new(),
            },
        }
    }

    pub fn dispatch(&mut self, command: CatalogCommand) -> Vec<CatalogEvent> {
        match command {
            CatalogCommand::SetCategory(category) => self.update_filters(|filters| {
                filters.category = category;
            }),
            CatalogCommand::SetStatus(status) => self.update_filters(|filters| {
                filters.status = status;
            }),
            CatalogCommand::ClearCategory => self.update_filters(|filters| {
                filters.category = FILTER_ALL.to_owned();
            }),
            CatalogCommand::ClearStatus => self.update_filters(|filters| {
                filters.status = FILTER_ALL.to_owned();
            }),
            CatalogCommand::ClearFilters => self.update_filters(|filters| {
                *filters = CatalogFilters::default();
            }),
            CatalogCommand::Inspect(id) => {
                let pickable = self.visible().iter().any(|project| project.id == id);
                if !pickable {
                    return Vec::new();
                }
                self.overlay = Overlay::Open(id.clone());
                vec![CatalogEvent::OverlayOpened(id)]
            }
            CatalogCommand::CloseOverlay => {
                if self.overlay == Overlay::Closed {
                    return Vec::new();
                }
                self.overlay = Overlay::Closed;
                vec![CatalogEvent::OverlayClosed]
            }
        }
    }

    fn update_filters(&mut self, change: impl FnOnce(&mut CatalogFilters)) -> Vec<CatalogEvent> {
        let before = self.filters.clone();
        change(&mut self.filters);
        if self.filters == before {
            return Vec::new();
        }
        vec![CatalogEvent::FiltersChanged(self.filters.clone())]
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CatalogCommand, CatalogDisplay, CatalogEvent, CatalogFilters, CatalogView,
        CollectionLoader, LoadResolution, LoadState, Overlay, UNAVAILABLE_REASON, cycle_option,
        filter_projects,
    };
    use crate::{CATEGORY_FILTERS, Project, ProjectId, RemoteFailure, STATUS_FILTERS};

    fn project(id: &str, category: &str, status: &str) -> Project {
        Project {
            id: ProjectId::new(id),
            title: format!("Project {id}"),
            description: String::new(),
            short_description: String::new(),
            technologies: Vec::new(),
            category: category.to_owned(),
            status: status.to_owned(),
            client_name: String::new(),
            project_url: None,
            github_url: None,
            image_url: String::new(),
            images: Vec::new(),
            start_date: None,
            end_date: None,
            featured: false,
            tags: Vec::new(),
            created_time: String::new(),
        }
    }

    fn sample_collection() -> Vec<Project> {
        vec![
            project("p1", "Web Development", "Completed"),
            project("p2", "Mobile Development", "In Progress"),
            project("p3", "Web Development", "Planning"),
            project("p4", "DevOps", "Completed"),
            project("p5", "Web Development", "Completed"),
        ]
    }

    fn ids(projects: &[&Project]) -> Vec<String> {
        projects
            .iter()
            .map(|project| project.id.as_str().to_owned())
            .collect()
    }

    fn loaded_view(items: Vec<Project>) -> CatalogView {
        let mut view = CatalogView::default();
        let (ticket, _) = view.begin_load();
        view.resolve_load(ticket, Ok(items));
        view
    }

    #[test]
    fn all_filters_pass_everything_in_source_order() {
        let collection = sample_collection();
        let filtered = filter_projects(&collection, "All", "All");
        assert_eq!(ids(&filtered), vec!["p1", "p2", "p3", "p4", "p5"]);
    }

    #[test]
    fn axes_combine_conjunctively() {
        let collection = sample_collection();
        let filtered = filter_projects(&collection, "Web Development", "Completed");
        assert_eq!(ids(&filtered), vec!["p1", "p5"]);

        let by_status = filter_projects(&collection, "All", "Completed");
        assert_eq!(ids(&by_status), vec!["p1", "p4", "p5"]);
    }

    #[test]
    fn category_match_is_exact_and_case_sensitive() {
        let collection = sample_collection();
        assert!(filter_projects(&collection, "web development", "All").is_empty());
        assert!(filter_projects(&collection, "Web Development ", "All").is_empty());
    }

    #[test]
    fn filtering_never_mutates_the_source() {
        let collection = sample_collection();
        let before = collection.clone();
        let _ = filter_projects(&collection, "DevOps", "Completed");
        assert_eq!(collection, before);
    }

    #[test]
    fn filters_report_activity() {
        assert!(!CatalogFilters::default().is_active());
        assert!(CatalogFilters::new("DevOps", "All").is_active());
        assert!(CatalogFilters::new("All", "Planning").is_active());
    }

    #[test]
    fn cycle_option_wraps_both_directions() {
        assert_eq!(cycle_option(&CATEGORY_FILTERS, "All", 1), "Web Development");
        assert_eq!(cycle_option(&CATEGORY_FILTERS, "All", -1), "DevOps");
        assert_eq!(cycle_option(&STATUS_FILTERS, "Planning", 1), "All");
        assert_eq!(cycle_option(&STATUS_FILTERS, "Archived", 1), "All");
    }

    #[test]
    fn loader_starts_loading_and_applies_success() {
        let mut loader = CollectionLoader::default();
        assert_eq!(loader.state(), &LoadState::Loading);

        let ticket = loader.begin();
        let resolution = loader.resolve(ticket, Ok(sample_collection()));
        assert_eq!(resolution, LoadResolution::Applied);
        assert_eq!(loader.state().projects().len(), 5);
    }

    #[test]
    fn loader_failure_holds_empty_collection_and_generic_reason() {
        let mut loader = CollectionLoader::default();
        let ticket = loader.begin();
        loader.resolve(
            ticket,
            Err(RemoteFailure::protocol("/api/projects", "server returned 500")),
        );
        assert_eq!(
            loader.state(),
            &LoadState::Failed {
                reason: UNAVAILABLE_REASON.to_owned()
            }
        );
        assert!(loader.state().projects().is_empty());
    }

    #[test]
    fn stale_ticket_is_discarded() {
        let mut loader = CollectionLoader::default();
        let first = loader.begin();
        let second = loader.begin();
        assert!(second > first);

        assert_eq!(
            loader.resolve(first, Ok(sample_collection())),
            LoadResolution::Stale
        );
        assert_eq!(loader.state(), &LoadState::Loading);

        assert_eq!(
            loader.resolve(second, Err(RemoteFailure::transport("/api/projects", "refused"))),
            LoadResolution::Applied
        );
        assert!(matches!(loader.state(), LoadState::Failed { .. }));
    }

    #[test]
    fn settled_ticket_cannot_resolve_twice() {
        let mut loader = CollectionLoader::default();
        let ticket = loader.begin();
        loader.resolve(ticket, Ok(sample_collection()));
        assert_eq!(
            loader.resolve(ticket, Err(RemoteFailure::transport("x", "late"))),
            LoadResolution::Stale
        );
        assert_eq!(loader.state().projects().len(), 5);
    }

    #[test]
    fn display_distinguishes_loading_empty_and_failed() {
        let mut view = CatalogView::default();
        assert_eq!(view.display(), CatalogDisplay::Loading);

        let (ticket, _) = view.begin_load();
        view.resolve_load(ticket, Ok(sample_collection()));
        view.dispatch(CatalogCommand::SetCategory("UI/UX Design".to_owned()));
        assert_eq!(view.display(), CatalogDisplay::Empty);

        let (retry, _) = view.begin_load();
        assert_eq!(view.display(), CatalogDisplay::Loading);
        view.resolve_load(retry, Err(RemoteFailure::transport("x", "down")));
        assert_eq!(
            view.display(),
            CatalogDisplay::Failed {
                reason: UNAVAILABLE_REASON
            }
        );
    }

    #[test]
    fn filter_commands_emit_events_only_on_change() {
        let mut view = loaded_view(sample_collection());

        let events = view.dispatch(CatalogCommand::SetStatus("Completed".to_owned()));
        assert_eq!(
            events,
            vec![CatalogEvent::FiltersChanged(CatalogFilters::new(
                "All",
                "Completed"
            ))]
        );
        assert!(
            view.dispatch(CatalogCommand::SetStatus("Completed".to_owned()))
                .is_empty()
        );

        view.dispatch(CatalogCommand::SetCategory("DevOps".to_owned()));
        assert_eq!(ids(&view.visible()), vec!["p4"]);

        view.dispatch(CatalogCommand::ClearCategory);
        assert_eq!(ids(&view.visible()), vec!["p1", "p4", "p5"]);

        view.dispatch(CatalogCommand::ClearFilters);
        assert_eq!(view.filters(), &CatalogFilters::default());
    }

    #[test]
    fn overlay_opens_replaces_and_closes() {
        let mut view = loaded_view(sample_collection());

        let opened = view.dispatch(CatalogCommand::Inspect(ProjectId::new("p2")));
        assert_eq!(opened, vec![CatalogEvent::OverlayOpened(ProjectId::new("p2"))]);
        assert_eq!(view.overlay(), &Overlay::Open(ProjectId::new("p2")));

        view.dispatch(CatalogCommand::Inspect(ProjectId::new("p4")));
        assert_eq!(view.overlay(), &Overlay::Open(ProjectId::new("p4")));
        assert_eq!(
            view.inspected().map(|project| project.id.as_str()),
            Some("p4")
        );

        let closed = view.dispatch(CatalogCommand::CloseOverlay);
        assert_eq!(closed, vec![CatalogEvent::OverlayClosed]);
        assert_eq!(view.overlay(), &Overlay::Closed);
        assert!(view.dispatch(CatalogCommand::CloseOverlay).is_empty());
    }

    #[test]
    fn overlay_only_opens_for_visible_projects() {
        let mut view = loaded_view(sample_collection());
        view.dispatch(CatalogCommand::SetCategory("DevOps".to_owned()));

        assert!(
            view.dispatch(CatalogCommand::Inspect(ProjectId::new("p1")))
                .is_empty()
        );
        assert!(
            view.dispatch(CatalogCommand::Inspect(ProjectId::new("missing")))
                .is_empty()
        );
        assert_eq!(view.overlay(), &Overlay::Closed);
    }

    #[test]
    fn overlay_survives_filter_changes_but_not_refetch() {
        let mut view = loaded_view(sample_collection());
        view.dispatch(CatalogCommand::Inspect(ProjectId::new("p3")));

        view.dispatch(CatalogCommand::SetStatus("Completed".to_owned()));
        assert_eq!(view.overlay(), &Overlay::Open(ProjectId::new("p3")));

        let (_, events) = view.begin_load();
        assert_eq!(events[0], CatalogEvent::OverlayClosed);
        assert_eq!(view.overlay(), &Overlay::Closed);
        assert!(view.inspected().is_none());
    }

    #[test]
    fn resolve_load_reports_stale_and_failure_events() {
        let mut view = CatalogView::default();
        let (first, _) = view.begin_load();
        let (second, _) = view.begin_load();

        assert_eq!(
            view.resolve_load(first, Ok(sample_collection())),
            vec![CatalogEvent::StaleResponseDiscarded(first)]
        );
        assert_eq!(
            view.resolve_load(second, Err(RemoteFailure::protocol("x", "bad body"))),
            vec![CatalogEvent::LoadFailed {
                reason: UNAVAILABLE_REASON.to_owned()
            }]
        );
        assert!(view.visible().is_empty());
    }
}
