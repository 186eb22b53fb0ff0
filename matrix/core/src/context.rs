//! Application Context
//!
//! Bundles a [`MatrixView`] with the [`MatrixController`] that drives it.
//! Hosts own one context and call [`MatrixContext::update`] once per frame.

use crate::config::MatrixConfig;
use crate::controller::{MatrixController, Page, Route};
use crate::events::ViewEvent;
use crate::physics::PhysicsField;
use crate::similarity::SimilarityTable;
use crate::view::MatrixView;

pub struct MatrixContext<R: Route> {
    view: MatrixView,
    controller: MatrixController<R>,
}

impl<R: Route> MatrixContext<R> {
    pub fn new(
        config: MatrixConfig,
        physics: Box<dyn PhysicsField>,
        similarity: SimilarityTable,
    ) -> Self {
        Self {
            view: MatrixView::new(config, physics, similarity),
            controller: MatrixController::new(),
        }
    }

    pub fn register(&mut self, route: R, page: Box<dyn Page<R>>) {
        self.controller.register(route, page);
    }

    /// Size the grid, then enter the page for `path`
    ///
    /// The resize is applied before the page is built so the first layout
    /// pass already sees the real frame and breakpoint.
    pub fn initialize(&mut self, pixel_width: f64, pixel_height: f64, path: &str) {
        self.view.resize(pixel_width, pixel_height);
        self.view.update();
        // the first resize never reports a breakpoint change
        self.view.drain_events();
        self.controller.initialize(&mut self.view, path);
    }

    pub fn set_route(&mut self, path: &str) {
        self.controller.set_route(&mut self.view, path);
    }

    pub fn set_navigate(&mut self, navigate: impl FnMut(&str) + 'static) {
        self.controller.set_navigate(navigate);
    }

    /// Run one frame and route its events to the controller
    ///
    /// Returns the events for hosts that want to observe them too.
    pub fn update(&mut self) -> Vec<ViewEvent> {
        self.view.update();
        let events = self.view.drain_events();
        for event in &events {
            self.controller.handle_event(&mut self.view, event);
        }
        events
    }

    pub fn step_physics(&mut self) {
        self.view.step_physics();
    }

    pub fn surface(&self) -> String {
        self.view.surface()
    }

    pub fn view(&self) -> &MatrixView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut MatrixView {
        &mut self.view
    }

    pub fn controller(&self) -> &MatrixController<R> {
        &self.controller
    }
}
