//! Translational time-of-impact queries between convex shapes.

pub use self::cast_result::{CastResult, ConvexCast};
pub use self::gjk_convex_cast::{GjkConvexCast, GJK_CAST_MAX_ITERATIONS, GJK_CAST_RADIUS};
pub use self::subsimplex_convex_cast::{SubsimplexConvexCast, SUBSIMPLEX_MAX_ITERATIONS};
pub use self::triangle_convex_cast::cast_convex_against_triangles;

mod cast_result;
mod gjk_convex_cast;
mod subsimplex_convex_cast;
mod triangle_convex_cast;
