//! Common landmark types shared by the hand, face and body modules.

use nalgebra::Vector2;

/// Position of a landmark: normalized X and Y image coordinates, followed by the relative depth Z.
pub type Position = [f32; 3];

/// An ordered list of landmarks, as produced by a landmark detector for a single object.
///
/// The meaning of each index depends on the detector that produced the list. The typed wrappers
/// [`HandLandmarks`], [`FaceLandmarks`] and [`PoseLandmarks`] check that the list is complete
/// before any index-based access takes place.
///
/// [`HandLandmarks`]: crate::hand::HandLandmarks
/// [`FaceLandmarks`]: crate::face::FaceLandmarks
/// [`PoseLandmarks`]: crate::body::PoseLandmarks
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    positions: Box<[Position]>,
}

impl Landmarks {
    /// Creates a new [`Landmarks`] collection containing `len` preallocated landmarks.
    ///
    /// All landmarks will start with all coordinates at `0.0`.
    pub fn new(len: usize) -> Self {
        Self {
            positions: vec![[0.0, 0.0, 0.0]; len].into_boxed_slice(),
        }
    }

    /// Creates a [`Landmarks`] collection holding the given positions in order.
    pub fn from_positions<I: IntoIterator<Item = Position>>(positions: I) -> Self {
        Self {
            positions: positions.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Landmark> + Clone + '_ {
        self.positions.iter().map(|&pos| Landmark::new(pos))
    }

    /// Returns the landmark at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> Landmark {
        Landmark::new(self.positions[index])
    }

    pub fn set(&mut self, index: usize, landmark: Landmark) {
        self.positions[index] = landmark.pos;
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Position] {
        &mut self.positions
    }

    pub fn map_positions(&mut self, mut f: impl FnMut(Position) -> Position) {
        for pos in self.positions_mut() {
            *pos = f(*pos);
        }
    }
}

/// A landmark in normalized image space.
#[derive(Debug, Default, PartialEq, PartialOrd, Clone, Copy)]
pub struct Landmark {
    pos: Position,
}

impl Landmark {
    pub fn new(position: Position) -> Self {
        Self { pos: position }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos[1]
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.pos[2]
    }

    /// Returns the X and Y coordinates as a 2D vector, dropping the depth.
    #[inline]
    pub fn xy(&self) -> Vector2<f32> {
        Vector2::new(self.pos[0], self.pos[1])
    }
}
