//! Demo Pages
//!
//! A standalone title page and two pages sharing navigation chrome. They
//! exist to exercise the engine from a terminal: transitions between pages,
//! hover transforms on links, inline children in text, and scrolling.

use matrix_core::glyphs::{add_underline, CHILD_PLACEHOLDER, DOT_CHAR};
use matrix_core::{
    Alignment, AnimationConfig, AnimationUse, ContainerLayout, CursorHint, Direction,
    HoverTransform, MatrixContext, MatrixView, NodeConfig, NodeId, Padding, Page, Route, Sizing,
    TextContent, Timing,
};

/// Key of the container chrome pages swap their content into
pub const CONTENT_CONTAINER: &str = "contentContainer";

const MAIN_CONTAINER: &str = "mainContainer";

const INLINE_HOME: &str = "inline-home";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DemoRoute {
    Title,
    About,
    Notes,
}

impl Route for DemoRoute {
    fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(DemoRoute::Title),
            "/about" => Some(DemoRoute::About),
            "/notes" => Some(DemoRoute::Notes),
            _ => None,
        }
    }

    fn path(&self) -> &'static str {
        match self {
            DemoRoute::Title => "/",
            DemoRoute::About => "/about",
            DemoRoute::Notes => "/notes",
        }
    }
}

impl DemoRoute {
    /// Route for a number key, `1` being the title page
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(DemoRoute::Title),
            '2' => Some(DemoRoute::About),
            '3' => Some(DemoRoute::Notes),
            _ => None,
        }
    }

    fn link_key(self) -> &'static str {
        match self {
            DemoRoute::Title => "link-title",
            DemoRoute::About => "link-about",
            DemoRoute::Notes => "link-notes",
        }
    }

    /// Route behind a clickable link; inline links carry their own keys
    fn from_link_key(key: &str) -> Option<Self> {
        if key == INLINE_HOME {
            return Some(DemoRoute::Title);
        }
        [DemoRoute::Title, DemoRoute::About, DemoRoute::Notes]
            .into_iter()
            .find(|route| route.link_key() == key)
    }
}

/// Register every demo page
pub fn register(context: &mut MatrixContext<DemoRoute>) {
    context.register(DemoRoute::Title, Box::new(TitlePage::default()));
    context.register(
        DemoRoute::About,
        Box::new(ChromePage::new(DemoRoute::About, ABOUT_TEXT)),
    );
    context.register(
        DemoRoute::Notes,
        Box::new(ChromePage::new(DemoRoute::Notes, NOTES_TEXT)),
    );
}

// ============================================================================
// Shared pieces
// ============================================================================

fn swipe_in() -> AnimationConfig {
    AnimationConfig::diagonal_swipe(2, AnimationUse::Entrance).with_head_speed(2)
}

fn trace_out() -> AnimationConfig {
    AnimationConfig::row_tracer(AnimationUse::Exit).with_head_speed(4)
}

fn link(view: &mut MatrixView, key: &str, label: &str) -> NodeId {
    let flicker = AnimationConfig::row_tracer(AnimationUse::Interaction).with_tail_length(4);
    view.create_text(
        NodeConfig::new(key)
            .clickable()
            .with_cursor(CursorHint::Pointer)
            .with_entrance(swipe_in())
            .with_exit(trace_out())
            .with_pointer_enter(flicker)
            .with_click_animation(flicker),
        TextContent::new(label).with_hover(HoverTransform::Bold),
    )
}

// ============================================================================
// Title
// ============================================================================

#[derive(Default)]
pub struct TitlePage {
    root: Option<NodeId>,
}

impl Page<DemoRoute> for TitlePage {
    fn enter(&mut self, view: &mut MatrixView, _rebuild_chrome: bool) {
        let root = view.create_container(
            NodeConfig::new("titleRoot")
                .fill()
                .with_background(DOT_CHAR)
                .with_entrance_timing(Timing::Series)
                .with_exit(trace_out()),
            ContainerLayout::column()
                .with_justify(Alignment::Center)
                .with_align(Alignment::Center)
                .with_spacing(1),
        );
        let heading = view.create_text(
            NodeConfig::new("titleHeading")
                .bordered()
                .with_padding(Padding::xy(2, 0))
                .with_entrance(swipe_in())
                .with_exit(trace_out()),
            TextContent::new(&add_underline("CHARACTER MATRIX")),
        );
        let links = view.create_container(
            NodeConfig::new("titleLinks").with_entrance_timing(Timing::Series),
            ContainerLayout::row().with_spacing(3),
        );
        let about = link(view, DemoRoute::About.link_key(), "ABOUT");
        let notes = link(view, DemoRoute::Notes.link_key(), "NOTES");

        view.set_root(root);
        view.set_children(links, &[about, notes]);
        view.set_children(root, &[heading, links]);
        view.start_transition(root, Direction::Enter);
        self.root = Some(root);
    }

    fn exit(&mut self, view: &mut MatrixView, _to_standalone: bool) -> Option<NodeId> {
        let root = self.root.take().filter(|id| view.node(*id).is_some())?;
        view.start_transition(root, Direction::Exit);
        Some(root)
    }

    fn on_click(&mut self, _view: &mut MatrixView, key: &str) -> Option<DemoRoute> {
        DemoRoute::from_link_key(key)
    }

    fn is_standalone(&self) -> bool {
        true
    }
}

// ============================================================================
// Chrome pages
// ============================================================================

const ABOUT_TEXT: &str = "A retained-mode interface drawn entirely in text. \
Containers, text and placeholders are laid out on a character grid, then \
animated in and out with sweeping tails of look-alike glyphs.\n\n\
A spring lattice ripples underneath and nudges every glyph toward a \
neighbour of similar weight. Press the mouse to pull on it.";

const NOTES_TEXT: &str = "Keys 1, 2 and 3 switch pages, q quits.\n\n\
Scroll with the wheel when the text runs past the frame.\n\n\
Back to the start: \u{FFFC}";

/// A page rendered inside the shared chrome
pub struct ChromePage {
    route: DemoRoute,
    body: &'static str,
    content: Option<NodeId>,
}

impl ChromePage {
    pub fn new(route: DemoRoute, body: &'static str) -> Self {
        Self {
            route,
            body,
            content: None,
        }
    }

    /// Root container with navigation and an empty content container
    fn build_chrome(view: &mut MatrixView) -> NodeId {
        let mobile = view.is_mobile();
        let layout = if mobile {
            ContainerLayout::column().with_spacing(1)
        } else {
            ContainerLayout::row().with_spacing(2)
        };
        let main = view.create_container(
            NodeConfig::new(MAIN_CONTAINER)
                .fill()
                .with_padding(Padding::uniform(1))
                .with_background(DOT_CHAR)
                .with_exit(trace_out()),
            layout,
        );

        let nav_layout = if mobile {
            ContainerLayout::row().with_spacing(2)
        } else {
            ContainerLayout::column().with_spacing(1)
        };
        let nav = view.create_container(
            NodeConfig::new("nav").with_entrance_timing(Timing::Series),
            nav_layout,
        );
        let links = [
            link(view, DemoRoute::Title.link_key(), "HOME"),
            link(view, DemoRoute::About.link_key(), "ABOUT"),
            link(view, DemoRoute::Notes.link_key(), "NOTES"),
        ];

        let (width, height) = if mobile {
            (Sizing::relative(1.0), Sizing::Expand)
        } else {
            (Sizing::Expand, Sizing::relative(1.0))
        };
        let content = view.create_container(
            NodeConfig::new(CONTENT_CONTAINER)
                .with_width(width)
                .with_height(height)
                .bordered()
                .with_padding(Padding::xy(1, 0))
                .scrollable()
                .with_entrance(swipe_in())
                .with_exit(trace_out()),
            ContainerLayout::column(),
        );

        view.set_root(main);
        view.set_children(nav, &links);
        view.set_children(main, &[nav, content]);
        main
    }

    fn build_body(&self, view: &mut MatrixView) -> NodeId {
        let body = view.create_text(
            NodeConfig::new(format!("body-{}", self.route.path()))
                .with_width(Sizing::relative(1.0))
                .with_entrance(swipe_in())
                .with_exit(trace_out()),
            TextContent::new(self.body),
        );
        if self.body.contains(CHILD_PLACEHOLDER) {
            let home = link(view, INLINE_HOME, "HOME");
            view.set_children(body, &[home]);
        }
        body
    }
}

impl Page<DemoRoute> for ChromePage {
    fn enter(&mut self, view: &mut MatrixView, rebuild_chrome: bool) {
        let main = if rebuild_chrome || view.element(CONTENT_CONTAINER).is_none() {
            Some(Self::build_chrome(view))
        } else {
            None
        };
        let Some(container) = view.element(CONTENT_CONTAINER) else {
            tracing::error!("Chrome has no content container");
            return;
        };

        let body = self.build_body(view);
        view.set_children(container, &[body]);
        self.content = Some(body);

        match main {
            Some(main) => view.start_transition(main, Direction::Enter),
            None => view.start_transition(body, Direction::Enter),
        }
    }

    fn exit(&mut self, view: &mut MatrixView, to_standalone: bool) -> Option<NodeId> {
        let target = if to_standalone {
            view.element(MAIN_CONTAINER)
        } else {
            self.content.take()
        };
        let target = target.filter(|id| view.node(*id).is_some())?;
        view.start_transition(target, Direction::Exit);
        Some(target)
    }

    fn on_click(&mut self, _view: &mut MatrixView, key: &str) -> Option<DemoRoute> {
        DemoRoute::from_link_key(key)
    }
}
