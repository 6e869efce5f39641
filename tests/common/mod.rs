//! Shared test helpers: in-memory surfaces and a fully mounted engine rig.

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::Cell;
use std::rc::Rc;

use quadview::{
    GridConfig, GridLayout, Quadrant, QuadrantSync, Surface, SurfaceRole,
};

/// An in-memory surface with DOM-like clamping semantics.
///
/// `offset_*` reflects the pinned CSS size when one is set, else the
/// natural content size, which is what the resync pass's natural-width
/// measurement relies on.
pub struct MockSurface {
    natural_width: Cell<f64>,
    natural_height: Cell<f64>,
    client_width: Cell<f64>,
    client_height: Cell<f64>,
    scroll_width: Cell<f64>,
    scroll_height: Cell<f64>,
    scroll_left: Cell<f64>,
    scroll_top: Cell<f64>,
    css_width: Cell<Option<f64>>,
    css_height: Cell<Option<f64>>,
    right_inset: Cell<f64>,
    bottom_inset: Cell<f64>,
    width_writes: Cell<usize>,
}

impl MockSurface {
    /// A plain sized box (headers, menus, containers).
    pub fn sized(width: f64, height: f64) -> Rc<Self> {
        Rc::new(Self {
            natural_width: Cell::new(width),
            natural_height: Cell::new(height),
            client_width: Cell::new(width),
            client_height: Cell::new(height),
            scroll_width: Cell::new(width),
            scroll_height: Cell::new(height),
            scroll_left: Cell::new(0.0),
            scroll_top: Cell::new(0.0),
            css_width: Cell::new(None),
            css_height: Cell::new(None),
            right_inset: Cell::new(0.0),
            bottom_inset: Cell::new(0.0),
            width_writes: Cell::new(0),
        })
    }

    /// A scrollable viewport: `client` is the visible size, `content` the
    /// scrollable extent, `scrollbar` the per-axis scrollbar thickness
    /// (adds to the offset size, DOM-style).
    pub fn scrollable(
        client: (f64, f64),
        content: (f64, f64),
        scrollbar: (f64, f64),
    ) -> Rc<Self> {
        Rc::new(Self {
            natural_width: Cell::new(client.0 + scrollbar.0),
            natural_height: Cell::new(client.1 + scrollbar.1),
            client_width: Cell::new(client.0),
            client_height: Cell::new(client.1),
            scroll_width: Cell::new(content.0),
            scroll_height: Cell::new(content.1),
            scroll_left: Cell::new(0.0),
            scroll_top: Cell::new(0.0),
            css_width: Cell::new(None),
            css_height: Cell::new(None),
            right_inset: Cell::new(0.0),
            bottom_inset: Cell::new(0.0),
            width_writes: Cell::new(0),
        })
    }

    pub fn css_width(&self) -> Option<f64> {
        self.css_width.get()
    }

    pub fn css_height(&self) -> Option<f64> {
        self.css_height.get()
    }

    pub fn right_inset(&self) -> f64 {
        self.right_inset.get()
    }

    pub fn bottom_inset(&self) -> f64 {
        self.bottom_inset.get()
    }

    /// Number of `set_width` writes so far (counts resync applications).
    pub fn width_writes(&self) -> usize {
        self.width_writes.get()
    }

    /// Force an offset without going through the engine, simulating a
    /// native scroll the engine has not seen yet.
    pub fn force_scroll(&self, left: f64, top: f64) {
        self.set_scroll_left(left);
        self.set_scroll_top(top);
    }
}

impl Surface for MockSurface {
    fn client_width(&self) -> f64 {
        self.client_width.get()
    }

    fn client_height(&self) -> f64 {
        self.client_height.get()
    }

    fn offset_width(&self) -> f64 {
        self.css_width.get().unwrap_or_else(|| self.natural_width.get())
    }

    fn offset_height(&self) -> f64 {
        self.css_height
            .get()
            .unwrap_or_else(|| self.natural_height.get())
    }

    fn scroll_width(&self) -> f64 {
        self.scroll_width.get()
    }

    fn scroll_height(&self) -> f64 {
        self.scroll_height.get()
    }

    fn scroll_left(&self) -> f64 {
        self.scroll_left.get()
    }

    fn scroll_top(&self) -> f64 {
        self.scroll_top.get()
    }

    fn set_scroll_left(&self, value: f64) {
        let max = (self.scroll_width.get() - self.client_width.get()).max(0.0);
        self.scroll_left.set(value.clamp(0.0, max));
    }

    fn set_scroll_top(&self, value: f64) {
        let max = (self.scroll_height.get() - self.client_height.get()).max(0.0);
        self.scroll_top.set(value.clamp(0.0, max));
    }

    fn set_width(&self, px: f64) {
        self.width_writes.set(self.width_writes.get() + 1);
        self.css_width.set(Some(px));
    }

    fn set_height(&self, px: f64) {
        self.css_height.set(Some(px));
    }

    fn clear_width(&self) {
        self.css_width.set(None);
    }

    fn set_right_inset(&self, px: f64) {
        self.right_inset.set(px);
    }

    fn set_bottom_inset(&self, px: f64) {
        self.bottom_inset.set(px);
    }
}

/// The mock surfaces registered for one quadrant.
pub struct MockQuadrant {
    pub container: Rc<MockSurface>,
    pub scroll: Rc<MockSurface>,
    pub row_header: Rc<MockSurface>,
    pub column_header: Rc<MockSurface>,
    pub menu: Rc<MockSurface>,
}

/// A fully mounted engine over mock surfaces.
pub struct TestRig {
    pub engine: QuadrantSync<GridLayout>,
    pub main: MockQuadrant,
    pub top: MockQuadrant,
    pub left: MockQuadrant,
    pub top_left: MockQuadrant,
}

/// Natural row-header width used by the rig's MAIN quadrant.
pub const RIG_ROW_HEADER_WIDTH: f64 = 80.0;
/// Column-header height used by the rig.
pub const RIG_COLUMN_HEADER_HEIGHT: f64 = 30.0;
/// Scrollbar thickness on MAIN's scroll surface.
pub const RIG_SCROLLBAR: f64 = 15.0;

fn mock_quadrant(quadrant: Quadrant) -> MockQuadrant {
    let scroll = match quadrant {
        // 400x300 viewport over 2000x2000 content, scrollbars on MAIN only.
        Quadrant::Main => MockSurface::scrollable(
            (400.0, 300.0),
            (2000.0, 2000.0),
            (RIG_SCROLLBAR, RIG_SCROLLBAR),
        ),
        _ => MockSurface::scrollable((400.0, 300.0), (2000.0, 2000.0), (0.0, 0.0)),
    };
    MockQuadrant {
        container: MockSurface::sized(400.0, 300.0),
        scroll,
        row_header: MockSurface::sized(RIG_ROW_HEADER_WIDTH, 300.0),
        column_header: MockSurface::sized(400.0, RIG_COLUMN_HEADER_HEIGHT),
        menu: MockSurface::sized(RIG_ROW_HEADER_WIDTH, RIG_COLUMN_HEADER_HEIGHT),
    }
}

fn register(engine: &mut QuadrantSync<GridLayout>, quadrant: Quadrant, mocks: &MockQuadrant) {
    engine.set_surface(quadrant, SurfaceRole::Container, mocks.container.clone());
    engine.set_surface(quadrant, SurfaceRole::ScrollSurface, mocks.scroll.clone());
    engine.set_surface(quadrant, SurfaceRole::RowHeader, mocks.row_header.clone());
    engine.set_surface(
        quadrant,
        SurfaceRole::ColumnHeader,
        mocks.column_header.clone(),
    );
    engine.set_surface(quadrant, SurfaceRole::Menu, mocks.menu.clone());
}

impl TestRig {
    /// Rig over a uniform 100x100 grid of 20x50 cells.
    pub fn new(config: GridConfig) -> Self {
        Self::with_layout(config, GridLayout::uniform(100, 100, 20.0, 50.0))
    }

    pub fn with_layout(config: GridConfig, layout: GridLayout) -> Self {
        let mut engine = QuadrantSync::new(layout, config).unwrap();
        let main = mock_quadrant(Quadrant::Main);
        let top = mock_quadrant(Quadrant::Top);
        let left = mock_quadrant(Quadrant::Left);
        let top_left = mock_quadrant(Quadrant::TopLeft);
        register(&mut engine, Quadrant::Main, &main);
        register(&mut engine, Quadrant::Top, &top);
        register(&mut engine, Quadrant::Left, &left);
        register(&mut engine, Quadrant::TopLeft, &top_left);
        TestRig {
            engine,
            main,
            top,
            left,
            top_left,
        }
    }

    /// Install a counting `on_scroll` observer; returns the counter.
    pub fn count_scroll_events(&mut self) -> Rc<Cell<usize>> {
        let counter = Rc::new(Cell::new(0));
        let inner = counter.clone();
        self.engine.set_on_scroll(move || {
            inner.set(inner.get() + 1);
        });
        counter
    }
}
