//! Page Controller
//!
//! Maps a closed set of routes to pages and drives page enter/exit.
//!
//! # Design
//!
//! A page change is two-phase. The current page starts its exit and names
//! the node whose exit completion ends it; the controller watches that node
//! and, when [`ViewEvent::TransitionComplete`] arrives for it, calls the
//! host's navigate callback and enters the next page. Requests made while a
//! change is in flight are dropped.
//!
//! Standalone pages own the whole screen. Every other page shares chrome
//! (navigation links around a `contentContainer`), which is only rebuilt
//! when arriving from a standalone page or after a breakpoint change.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::element::NodeId;
use crate::events::ViewEvent;
use crate::sequence::Direction;
use crate::view::MatrixView;

/// A closed set of page identifiers
pub trait Route: Copy + Eq + Hash + Debug + 'static {
    fn from_path(path: &str) -> Option<Self>;

    fn path(&self) -> &'static str;
}

/// A screen the controller can enter and exit
pub trait Page<R: Route> {
    /// Build the page's nodes and start their entrance
    ///
    /// `rebuild_chrome` is set when the shared chrome is missing or stale.
    fn enter(&mut self, view: &mut MatrixView, rebuild_chrome: bool);

    /// Start the page's exit
    ///
    /// Returns the node whose exit completion ends the page, or `None` when
    /// the page is gone already.
    fn exit(&mut self, view: &mut MatrixView, to_standalone: bool) -> Option<NodeId>;

    /// React to a click; returning a route navigates there
    fn on_click(&mut self, _view: &mut MatrixView, _key: &str) -> Option<R> {
        None
    }

    /// Whether the page replaces the shared chrome
    fn is_standalone(&self) -> bool {
        false
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingChange<R> {
    to: R,
    node: NodeId,
}

type NavigateFn = Box<dyn FnMut(&str)>;

/// Drives page changes for routes `R`
pub struct MatrixController<R: Route> {
    pages: HashMap<R, Box<dyn Page<R>>>,
    current: Option<R>,
    pending: Option<PendingChange<R>>,
    /// A breakpoint crossed mid-navigation; the next enter rebuilds chrome
    rebuild_pending: bool,
    navigate: Option<NavigateFn>,
}

impl<R: Route> Default for MatrixController<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Route> MatrixController<R> {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            current: None,
            pending: None,
            rebuild_pending: false,
            navigate: None,
        }
    }

    /// Register the page shown for `route`, replacing any earlier one
    pub fn register(&mut self, route: R, page: Box<dyn Page<R>>) {
        if self.pages.insert(route, page).is_some() {
            tracing::debug!(?route, "Replaced page registration");
        }
    }

    /// Callback invoked with the new path once a page change commits
    pub fn set_navigate(&mut self, navigate: impl FnMut(&str) + 'static) {
        self.navigate = Some(Box::new(navigate));
    }

    pub fn current(&self) -> Option<R> {
        self.current
    }

    /// Whether a page is exiting and the next one has not entered yet
    pub fn is_navigating(&self) -> bool {
        self.pending.is_some()
    }

    /// Enter the page for `path` with fresh chrome
    pub fn initialize(&mut self, view: &mut MatrixView, path: &str) {
        let Some(route) = R::from_path(path) else {
            tracing::warn!(path, "No route for initial path");
            return;
        };
        let Some(page) = self.pages.get_mut(&route) else {
            tracing::warn!(?route, "No page registered for route");
            return;
        };
        tracing::info!(?route, "Initializing controller");
        page.enter(view, true);
        self.current = Some(route);
        self.pending = None;
        self.rebuild_pending = false;
    }

    /// Change page to the route for `path`; unknown paths are ignored
    pub fn set_route(&mut self, view: &mut MatrixView, path: &str) {
        match R::from_path(path) {
            Some(route) => self.set_page(view, route),
            None => tracing::warn!(path, "Ignoring unknown route"),
        }
    }

    /// Start a change to `to`
    ///
    /// Does nothing when `to` is current, unregistered, or a change is
    /// already in flight.
    pub fn set_page(&mut self, view: &mut MatrixView, to: R) {
        if self.current == Some(to) {
            return;
        }
        if let Some(pending) = self.pending {
            tracing::debug!(?to, in_flight = ?pending.to, "Page change already in flight");
            return;
        }
        let Some(to_standalone) = self.pages.get(&to).map(|p| p.is_standalone()) else {
            tracing::warn!(?to, "No page registered for route");
            return;
        };

        let exit_node = self
            .current
            .and_then(|current| self.pages.get_mut(&current))
            .and_then(|page| page.exit(view, to_standalone));
        tracing::debug!(from = ?self.current, ?to, "Setting page");

        match exit_node {
            Some(node) => {
                view.watch(node);
                self.pending = Some(PendingChange { to, node });
            }
            None => self.finish(view, to),
        }
    }

    fn finish(&mut self, view: &mut MatrixView, to: R) {
        let breakpoint_crossed = std::mem::take(&mut self.rebuild_pending);
        let rebuild_chrome = breakpoint_crossed
            || self
                .current
                .and_then(|current| self.pages.get(&current))
                .map_or(true, |page| page.is_standalone());

        if let Some(navigate) = self.navigate.as_mut() {
            navigate(to.path());
        }
        if let Some(page) = self.pages.get_mut(&to) {
            page.enter(view, rebuild_chrome);
        }
        self.current = Some(to);
        tracing::info!(route = ?to, "Page entered");
    }

    /// Route a view event to the pages
    pub fn handle_event(&mut self, view: &mut MatrixView, event: &ViewEvent) {
        match event {
            ViewEvent::Clicked { key } => {
                let target = self
                    .current
                    .and_then(|current| self.pages.get_mut(&current))
                    .and_then(|page| page.on_click(view, key));
                if let Some(route) = target {
                    self.set_page(view, route);
                }
            }
            ViewEvent::TransitionComplete {
                node,
                direction: Direction::Exit,
                ..
            } => {
                if let Some(pending) = self.pending.filter(|p| p.node == *node) {
                    self.pending = None;
                    self.finish(view, pending.to);
                }
            }
            ViewEvent::TransitionComplete { .. } => {}
            ViewEvent::BreakpointChanged { .. } => self.handle_breakpoint_change(view),
        }
    }

    /// Re-enter the current page so it rebuilds chrome for the new layout
    pub fn handle_breakpoint_change(&mut self, view: &mut MatrixView) {
        if self.pending.is_some() {
            tracing::debug!("Breakpoint changed mid-navigation; next page will rebuild");
            self.rebuild_pending = true;
            return;
        }
        if let Some(page) = self.current.and_then(|current| self.pages.get_mut(&current)) {
            page.enter(view, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatrixConfig;
    use crate::element::{ContainerLayout, NodeConfig};
    use crate::geometry::Axis;
    use crate::physics::StillField;
    use crate::similarity::SimilarityTable;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum TestRoute {
        Home,
        Other,
    }

    impl Route for TestRoute {
        fn from_path(path: &str) -> Option<Self> {
            match path {
                "/" => Some(TestRoute::Home),
                "/other" => Some(TestRoute::Other),
                _ => None,
            }
        }

        fn path(&self) -> &'static str {
            match self {
                TestRoute::Home => "/",
                TestRoute::Other => "/other",
            }
        }
    }

    /// Records calls; exits with a bare node so completion needs one frame
    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        root: Option<NodeId>,
    }

    impl Page<TestRoute> for Recorder {
        fn enter(&mut self, view: &mut MatrixView, rebuild_chrome: bool) {
            self.log
                .borrow_mut()
                .push(format!("enter {} {rebuild_chrome}", self.name));
            let root = view.create_container(NodeConfig::new(self.name).fill(), ContainerLayout::new(Axis::Y));
            view.set_root(root);
            view.start_transition(root, Direction::Enter);
            self.root = Some(root);
        }

        fn exit(&mut self, view: &mut MatrixView, _to_standalone: bool) -> Option<NodeId> {
            self.log.borrow_mut().push(format!("exit {}", self.name));
            let root = self.root?;
            view.start_transition(root, Direction::Exit);
            Some(root)
        }
    }

    fn setup() -> (MatrixView, MatrixController<TestRoute>, Rc<RefCell<Vec<String>>>) {
        let view = MatrixView::new(
            MatrixConfig::default(),
            Box::new(StillField),
            SimilarityTable::builtin(),
        );
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut controller = MatrixController::new();
        for (route, name) in [(TestRoute::Home, "home"), (TestRoute::Other, "other")] {
            controller.register(
                route,
                Box::new(Recorder {
                    name,
                    log: Rc::clone(&log),
                    root: None,
                }),
            );
        }
        (view, controller, log)
    }

    #[test]
    fn test_initialize_enters_with_chrome() {
        let (mut view, mut controller, log) = setup();
        controller.initialize(&mut view, "/");
        assert_eq!(controller.current(), Some(TestRoute::Home));
        assert_eq!(*log.borrow(), vec!["enter home true"]);
    }

    #[test]
    fn test_unknown_route_is_ignored() {
        let (mut view, mut controller, log) = setup();
        controller.initialize(&mut view, "/");
        controller.set_route(&mut view, "/missing");
        assert_eq!(controller.current(), Some(TestRoute::Home));
        assert!(!controller.is_navigating());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_set_page_to_current_is_noop() {
        let (mut view, mut controller, log) = setup();
        controller.initialize(&mut view, "/");
        controller.set_page(&mut view, TestRoute::Home);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_change_waits_for_exit_completion() {
        let (mut view, mut controller, log) = setup();
        let paths = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&paths);
        controller.set_navigate(move |path| sink.borrow_mut().push(path.to_string()));
        controller.initialize(&mut view, "/");

        controller.set_route(&mut view, "/other");
        assert!(controller.is_navigating());
        assert_eq!(controller.current(), Some(TestRoute::Home));

        // a second request while in flight is dropped
        controller.set_page(&mut view, TestRoute::Home);

        view.update();
        for event in view.drain_events() {
            controller.handle_event(&mut view, &event);
        }

        assert!(!controller.is_navigating());
        assert_eq!(controller.current(), Some(TestRoute::Other));
        assert_eq!(*paths.borrow(), vec!["/other"]);
        assert_eq!(
            *log.borrow(),
            vec!["enter home true", "exit home", "enter other false"]
        );
    }

    #[test]
    fn test_breakpoint_during_change_rebuilds_next_page() {
        let (mut view, mut controller, log) = setup();
        controller.initialize(&mut view, "/");
        controller.set_route(&mut view, "/other");
        let exiting = view.element("home").expect("home root");

        controller.handle_event(&mut view, &ViewEvent::BreakpointChanged { mobile: true });
        assert!(controller.is_navigating());

        controller.handle_event(
            &mut view,
            &ViewEvent::TransitionComplete {
                node: exiting,
                key: "home".to_string(),
                direction: Direction::Exit,
            },
        );

        assert_eq!(controller.current(), Some(TestRoute::Other));
        assert_eq!(
            *log.borrow(),
            vec!["enter home true", "exit home", "enter other true"]
        );

        // the rebuild is consumed by one enter
        controller.set_route(&mut view, "/");
        view.update();
        for event in view.drain_events() {
            controller.handle_event(&mut view, &event);
        }
        assert_eq!(log.borrow().last().map(String::as_str), Some("enter home false"));
    }
}
