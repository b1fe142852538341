use crate::math::{Point, Real, Vector};

bitflags::bitflags! {
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
    #[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
    /// Selects what is drawn by the debug rendering.
    pub struct DebugDrawModes: u32 {
        /// Draw the frame of each body, and the wheels of vehicles.
        const DRAW_WIREFRAME = 1;
        /// Draw the bounding box of each body.
        const DRAW_AABB = 1 << 1;
        /// Draw the feature text.
        const DRAW_FEATURES_TEXT = 1 << 2;
        /// Draw the contact points of each manifold.
        const DRAW_CONTACT_POINTS = 1 << 3;
        /// Don't draw the help text.
        const NO_HELP_TEXT = 1 << 5;
        /// Draw the text attached to bodies.
        const DRAW_TEXT = 1 << 6;
    }
}

/// A renderer for the debug geometry of a dynamics world.
///
/// Debug rendering only reads the simulation state.
pub trait DebugRenderBackend {
    /// Draws a segment.
    fn draw_line(&mut self, from: &Point<Real>, to: &Point<Real>, color: &Vector<Real>);

    /// Draws a contact point with its normal.
    fn draw_contact_point(
        &mut self,
        point_on_b: &Point<Real>,
        normal_on_b: &Vector<Real>,
        distance: Real,
        lifetime: u32,
        color: &Vector<Real>,
    );

    /// Draws text at the given location.
    fn draw_3d_text(&mut self, location: &Point<Real>, text: &str);

    /// Reports a problem found while drawing.
    fn report_error_warning(&mut self, warning: &str);

    /// What to draw.
    fn debug_mode(&self) -> DebugDrawModes;

    /// Draws the edges of an axis-aligned box.
    fn draw_aabb(&mut self, mins: &Point<Real>, maxs: &Point<Real>, color: &Vector<Real>) {
        let corner = |i: usize| {
            Point::new(
                if i & 1 == 0 { mins.x } else { maxs.x },
                if i & 2 == 0 { mins.y } else { maxs.y },
                if i & 4 == 0 { mins.z } else { maxs.z },
            )
        };

        for i in 0..8 {
            for bit in [1, 2, 4] {
                if i & bit == 0 {
                    self.draw_line(&corner(i), &corner(i | bit), color);
                }
            }
        }
    }
}
