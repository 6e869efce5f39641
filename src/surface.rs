//! Surface abstraction and the per-quadrant surface registry.
//!
//! The engine is UI-agnostic: the host renders the four quadrants however it
//! likes and registers each measurable/mutable region here. On the web the
//! implementations wrap DOM elements (see `dom`); tests use in-memory mocks.
//!
//! All offsets and sizes are logical (CSS) pixels as `f64`, matching DOM
//! scroll precision. Scroll offsets are clamped by the surface itself to
//! `scroll_size - client_size`; the engine never re-clamps.

use std::fmt;
use std::rc::Rc;

use crate::quadrant::{Quadrant, QuadrantMap};

/// A mounted, measurable, mutable UI region.
///
/// Methods take `&self`; implementations use interior mutability (DOM
/// elements already do, mocks use `Cell`).
pub trait Surface {
    /// Inner width excluding scrollbars.
    fn client_width(&self) -> f64;
    /// Inner height excluding scrollbars.
    fn client_height(&self) -> f64;
    /// Border-box width including scrollbars.
    fn offset_width(&self) -> f64;
    /// Border-box height including scrollbars.
    fn offset_height(&self) -> f64;
    /// Total scrollable content width.
    fn scroll_width(&self) -> f64;
    /// Total scrollable content height.
    fn scroll_height(&self) -> f64;

    /// Current horizontal scroll offset.
    fn scroll_left(&self) -> f64;
    /// Current vertical scroll offset.
    fn scroll_top(&self) -> f64;
    /// Set the horizontal scroll offset (clamped by the surface).
    fn set_scroll_left(&self, value: f64);
    /// Set the vertical scroll offset (clamped by the surface).
    fn set_scroll_top(&self, value: f64);

    /// Pin the surface's width to an explicit pixel value.
    fn set_width(&self, px: f64);
    /// Pin the surface's height to an explicit pixel value.
    fn set_height(&self, px: f64);
    /// Remove the width constraint so the surface sizes to its content.
    ///
    /// Reading `offset_width` afterwards yields the natural content width;
    /// this is the one deliberate forced reflow in the resync pass.
    fn clear_width(&self);
    /// Inset the surface from its right edge (reveals MAIN's vertical
    /// scrollbar instead of covering it).
    fn set_right_inset(&self, px: f64);
    /// Inset the surface from its bottom edge.
    fn set_bottom_inset(&self, px: f64);
}

/// Shared handle to a registered surface.
pub type SurfaceRef = Rc<dyn Surface>;

/// Logical role a surface plays within its quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceRole {
    /// Outer quadrant box; sized and inset by the resync pass.
    Container,
    /// The element whose scroll offsets drive (or follow) the grid.
    ScrollSurface,
    /// Row header strip; optional, globally toggleable.
    RowHeader,
    /// Column header strip; optional.
    ColumnHeader,
    /// Menu corner box kept flush with both headers; optional.
    Menu,
}

impl fmt::Display for SurfaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SurfaceRole::Container => "container",
            SurfaceRole::ScrollSurface => "scroll surface",
            SurfaceRole::RowHeader => "row header",
            SurfaceRole::ColumnHeader => "column header",
            SurfaceRole::Menu => "menu",
        };
        f.write_str(name)
    }
}

/// The surfaces registered for one quadrant.
///
/// Row header, column header, and menu are optional; quadrants that never
/// render them simply leave the role unset and every consumer null-checks.
#[derive(Clone, Default)]
pub struct SurfaceSet {
    pub(crate) container: Option<SurfaceRef>,
    pub(crate) scroll_surface: Option<SurfaceRef>,
    pub(crate) row_header: Option<SurfaceRef>,
    pub(crate) column_header: Option<SurfaceRef>,
    pub(crate) menu: Option<SurfaceRef>,
}

impl SurfaceSet {
    /// The quadrant's outer container, if registered.
    pub fn container(&self) -> Option<&SurfaceRef> {
        self.container.as_ref()
    }

    /// The quadrant's scroll surface, if registered.
    pub fn scroll_surface(&self) -> Option<&SurfaceRef> {
        self.scroll_surface.as_ref()
    }

    /// The quadrant's row header, if registered.
    pub fn row_header(&self) -> Option<&SurfaceRef> {
        self.row_header.as_ref()
    }

    /// The quadrant's column header, if registered.
    pub fn column_header(&self) -> Option<&SurfaceRef> {
        self.column_header.as_ref()
    }

    /// The quadrant's menu corner, if registered.
    pub fn menu(&self) -> Option<&SurfaceRef> {
        self.menu.as_ref()
    }
}

/// Per-quadrant mapping from role to live surface.
///
/// Pure storage: registration never touches a surface's styling or
/// listeners. Setting a role twice overwrites, which supports remounts.
#[derive(Clone, Default)]
pub struct SurfaceRegistry {
    sets: QuadrantMap<SurfaceSet>,
}

impl SurfaceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the surface for `role` in `quadrant`.
    pub fn set(&mut self, quadrant: Quadrant, role: SurfaceRole, surface: SurfaceRef) {
        let set = self.sets.get_mut(quadrant);
        match role {
            SurfaceRole::Container => set.container = Some(surface),
            SurfaceRole::ScrollSurface => set.scroll_surface = Some(surface),
            SurfaceRole::RowHeader => set.row_header = Some(surface),
            SurfaceRole::ColumnHeader => set.column_header = Some(surface),
            SurfaceRole::Menu => set.menu = Some(surface),
        }
    }

    /// The full surface set for a quadrant.
    pub fn quadrant(&self, quadrant: Quadrant) -> &SurfaceSet {
        self.sets.get(quadrant)
    }

    /// Scroll surface for a quadrant, if mounted.
    pub fn scroll_surface(&self, quadrant: Quadrant) -> Option<&SurfaceRef> {
        self.sets.get(quadrant).scroll_surface()
    }

    /// Row header width for a quadrant; zero when the header is absent.
    pub fn row_header_width(&self, quadrant: Quadrant) -> f64 {
        self.sets
            .get(quadrant)
            .row_header()
            .map(|s| s.offset_width())
            .unwrap_or(0.0)
    }

    /// Column header height for a quadrant; zero when the header is absent.
    pub fn column_header_height(&self, quadrant: Quadrant) -> f64 {
        self.sets
            .get(quadrant)
            .column_header()
            .map(|s| s.offset_height())
            .unwrap_or(0.0)
    }

    /// Current scroll offset of a quadrant; `(0, 0)` when unmounted.
    pub fn scroll_offset(&self, quadrant: Quadrant) -> (f64, f64) {
        self.sets
            .get(quadrant)
            .scroll_surface()
            .map(|s| (s.scroll_left(), s.scroll_top()))
            .unwrap_or((0.0, 0.0))
    }
}

/// Thickness of a surface's vertical scrollbar; zero when none is rendered.
pub fn vertical_scrollbar_thickness(surface: &dyn Surface) -> f64 {
    (surface.offset_width() - surface.client_width()).max(0.0)
}

/// Thickness of a surface's horizontal scrollbar; zero when none is rendered.
pub fn horizontal_scrollbar_thickness(surface: &dyn Surface) -> f64 {
    (surface.offset_height() - surface.client_height()).max(0.0)
}
