//! Quadrant identities and a dense per-quadrant map.
//!
//! A frozen-pane grid renders as four regions: the scrollable body plus up
//! to three frozen strips. Every per-quadrant binding in this crate takes a
//! [`Quadrant`] parameter and stores its state in a [`QuadrantMap`], rather
//! than hand-writing four near-identical closures per concern.

use std::fmt;

/// One of the four independently rendered regions of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// The scrollable body. The only region wired to native scroll events.
    Main,
    /// Frozen rows; follows MAIN horizontally.
    Top,
    /// Frozen columns; follows MAIN vertically.
    Left,
    /// Intersection of frozen rows and columns; never scrolls.
    TopLeft,
}

impl Quadrant {
    /// All quadrants, MAIN first.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Main,
        Quadrant::Top,
        Quadrant::Left,
        Quadrant::TopLeft,
    ];

    /// True for the quadrants that render frozen rows (TOP, TOP_LEFT).
    pub fn has_frozen_rows(self) -> bool {
        matches!(self, Quadrant::Top | Quadrant::TopLeft)
    }

    /// True for the quadrants that render frozen columns (LEFT, TOP_LEFT).
    pub fn has_frozen_columns(self) -> bool {
        matches!(self, Quadrant::Left | Quadrant::TopLeft)
    }
}

impl std::str::FromStr for Quadrant {
    type Err = crate::error::QuadViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Quadrant::Main),
            "top" => Ok(Quadrant::Top),
            "left" => Ok(Quadrant::Left),
            "top-left" => Ok(Quadrant::TopLeft),
            other => Err(crate::error::QuadViewError::Other(format!(
                "unknown quadrant: {other}"
            ))),
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quadrant::Main => "main",
            Quadrant::Top => "top",
            Quadrant::Left => "left",
            Quadrant::TopLeft => "top-left",
        };
        f.write_str(name)
    }
}

/// Dense map from [`Quadrant`] to `T`.
#[derive(Debug, Clone, Default)]
pub struct QuadrantMap<T> {
    main: T,
    top: T,
    left: T,
    top_left: T,
}

impl<T> QuadrantMap<T> {
    /// Build a map by invoking `f` once per quadrant, in `Quadrant::ALL` order.
    pub fn from_fn(mut f: impl FnMut(Quadrant) -> T) -> Self {
        Self {
            main: f(Quadrant::Main),
            top: f(Quadrant::Top),
            left: f(Quadrant::Left),
            top_left: f(Quadrant::TopLeft),
        }
    }

    /// Shared access to one quadrant's slot.
    pub fn get(&self, quadrant: Quadrant) -> &T {
        match quadrant {
            Quadrant::Main => &self.main,
            Quadrant::Top => &self.top,
            Quadrant::Left => &self.left,
            Quadrant::TopLeft => &self.top_left,
        }
    }

    /// Mutable access to one quadrant's slot.
    pub fn get_mut(&mut self, quadrant: Quadrant) -> &mut T {
        match quadrant {
            Quadrant::Main => &mut self.main,
            Quadrant::Top => &mut self.top,
            Quadrant::Left => &mut self.left,
            Quadrant::TopLeft => &mut self.top_left,
        }
    }

    /// Iterate `(quadrant, value)` pairs in `Quadrant::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Quadrant, &T)> {
        Quadrant::ALL.iter().map(move |&q| (q, self.get(q)))
    }
}
