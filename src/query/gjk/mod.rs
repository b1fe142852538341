//! The GJK algorithm for distance computation, and its penetration depth fallback.

pub use self::cso_point::CSOPoint;
pub use self::gjk::{ClosestPoints, GjkExit, GjkPairDetector, GJK_MAX_ITERATIONS, REL_ERROR2};
pub use self::penetration::{MinkowskiPenetrationDepth, PenetrationResult, NUM_UNIT_SPHERE_POINTS};
pub use self::special_support_maps::ConstantOrigin;
pub use self::voronoi_simplex::{
    closest_pt_origin_tetrahedron, closest_pt_origin_triangle, origin_outside_of_plane,
    PlaneSide, SubSimplexClosestResult, UsedVertices, VoronoiSimplex,
    DEFAULT_EQUAL_VERTEX_THRESHOLD,
};

mod cso_point;
mod gjk;
mod penetration;
mod special_support_maps;
mod voronoi_simplex;
