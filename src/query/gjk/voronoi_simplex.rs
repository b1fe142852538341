use crate::math::{Point, Real, Vector, LARGE_FLOAT};
use crate::query::gjk::CSOPoint;

/// Two simplex vertices closer than this (squared distance) are considered equal.
pub const DEFAULT_EQUAL_VERTEX_THRESHOLD: Real = 1.0e-4;

const MAX_VERTICES: usize = 4;

bitflags::bitflags! {
    #[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
    /// The vertices of a simplex contributing to its closest point to the origin.
    pub struct UsedVertices: u8 {
        /// The first vertex is used.
        const A = 1;
        /// The second vertex is used.
        const B = 1 << 1;
        /// The third vertex is used.
        const C = 1 << 2;
        /// The fourth vertex is used.
        const D = 1 << 3;
    }
}

/// The side of a tetrahedron face a point lies on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaneSide {
    /// The point and the opposite vertex are on different sides of the face.
    Outside,
    /// The point is on the same side of the face as the opposite vertex.
    Inside,
    /// The tetrahedron is flat: the opposite vertex lies (almost) on the face plane.
    Degenerate,
}

/// The closest point of a sub-simplex to the origin, with its barycentric coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SubSimplexClosestResult {
    /// The closest point.
    pub closest_point: Point<Real>,
    /// The vertices the closest point is a combination of.
    pub used_vertices: UsedVertices,
    /// The barycentric coordinates of the closest point wrt. the simplex vertices.
    pub barycentric: [Real; 4],
    /// Set if the simplex was affinely dependent, in which case the other fields are meaningless.
    pub degenerate: bool,
}

impl Default for SubSimplexClosestResult {
    fn default() -> Self {
        Self {
            closest_point: Point::origin(),
            used_vertices: UsedVertices::empty(),
            barycentric: [0.0; 4],
            degenerate: false,
        }
    }
}

impl SubSimplexClosestResult {
    fn reset(&mut self) {
        self.degenerate = false;
        self.barycentric = [0.0; 4];
        self.used_vertices = UsedVertices::empty();
    }

    /// Are all the barycentric coordinates non-negative?
    pub fn is_valid(&self) -> bool {
        self.barycentric.iter().all(|b| *b >= 0.0)
    }

    fn set_barycentric(&mut self, a: Real, b: Real, c: Real, d: Real) {
        self.barycentric = [a, b, c, d];
    }
}

/// A simplex of dimension up to 3 using Voronoï regions for computing the closest point
/// to the origin.
///
/// Vertices are added one at a time. The closest point is lazily recomputed after each
/// addition, and the vertices that do not contribute to it are removed, so the simplex
/// always shrinks back to the smallest sub-simplex supporting its closest point.
#[derive(Clone, Debug)]
pub struct VoronoiSimplex {
    vertices: [CSOPoint; MAX_VERTICES],
    num_vertices: usize,
    equal_vertex_threshold: Real,

    cached_p1: Point<Real>,
    cached_p2: Point<Real>,
    cached_v: Vector<Real>,
    last_w: Point<Real>,
    cached_valid_closest: bool,
    cached_bc: SubSimplexClosestResult,
    needs_update: bool,
}

impl Default for VoronoiSimplex {
    fn default() -> Self {
        Self::new()
    }
}

impl VoronoiSimplex {
    /// Creates a new empty simplex.
    pub fn new() -> VoronoiSimplex {
        VoronoiSimplex {
            vertices: [CSOPoint::origin(); MAX_VERTICES],
            num_vertices: 0,
            equal_vertex_threshold: DEFAULT_EQUAL_VERTEX_THRESHOLD,
            cached_p1: Point::origin(),
            cached_p2: Point::origin(),
            cached_v: Vector::zeros(),
            last_w: Point::from(Vector::repeat(LARGE_FLOAT)),
            cached_valid_closest: false,
            cached_bc: SubSimplexClosestResult::default(),
            needs_update: true,
        }
    }

    /// Removes all the vertices of this simplex.
    pub fn reset(&mut self) {
        self.cached_valid_closest = false;
        self.num_vertices = 0;
        self.needs_update = true;
        self.last_w = Point::from(Vector::repeat(LARGE_FLOAT));
        self.cached_bc.reset();
    }

    /// Sets the squared distance under which two vertices are considered equal.
    pub fn set_equal_vertex_threshold(&mut self, threshold: Real) {
        self.equal_vertex_threshold = threshold;
    }

    /// The squared distance under which two vertices are considered equal.
    pub fn equal_vertex_threshold(&self) -> Real {
        self.equal_vertex_threshold
    }

    /// The number of vertices of this simplex.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Does this simplex have no vertex?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_vertices == 0
    }

    /// Does this simplex have four vertices?
    #[inline]
    pub fn is_full(&self) -> bool {
        self.num_vertices == MAX_VERTICES
    }

    /// The vertices of this simplex.
    #[inline]
    pub fn vertices(&self) -> &[CSOPoint] {
        &self.vertices[..self.num_vertices]
    }

    /// Adds a vertex to this simplex.
    ///
    /// The simplex must not be full.
    pub fn add_vertex(&mut self, pt: CSOPoint) {
        debug_assert!(self.num_vertices < MAX_VERTICES);
        self.last_w = pt.point;
        self.needs_update = true;
        self.vertices[self.num_vertices] = pt;
        self.num_vertices += 1;
    }

    fn remove_vertex(&mut self, index: usize) {
        debug_assert!(self.num_vertices > 0);
        self.num_vertices -= 1;
        self.vertices[index] = self.vertices[self.num_vertices];
    }

    fn reduce_vertices(&mut self, used: UsedVertices) {
        if self.num_vertices >= 4 && !used.contains(UsedVertices::D) {
            self.remove_vertex(3);
        }
        if self.num_vertices >= 3 && !used.contains(UsedVertices::C) {
            self.remove_vertex(2);
        }
        if self.num_vertices >= 2 && !used.contains(UsedVertices::B) {
            self.remove_vertex(1);
        }
        if self.num_vertices >= 1 && !used.contains(UsedVertices::A) {
            self.remove_vertex(0);
        }
    }

    /// The vector from the closest point of this simplex to the origin, if it could be
    /// computed.
    ///
    /// Returns `None` if the simplex is empty, or if it is an affinely dependent tetrahedron.
    /// A tetrahedron enclosing the origin yields the zero vector.
    pub fn closest(&mut self) -> Option<Vector<Real>> {
        if self.update_closest_vector_and_points() {
            Some(self.cached_v)
        } else {
            None
        }
    }

    /// The last successfully computed closest vector.
    #[inline]
    pub fn backup_closest(&self) -> Vector<Real> {
        self.cached_v
    }

    /// The closest points on the first and second shapes, computed from the barycentric
    /// coordinates of the closest point of this simplex.
    pub fn compute_points(&mut self) -> (Point<Real>, Point<Real>) {
        let _ = self.update_closest_vector_and_points();
        (self.cached_p1, self.cached_p2)
    }

    /// The barycentric description of the current closest point.
    pub fn closest_result(&mut self) -> &SubSimplexClosestResult {
        let _ = self.update_closest_vector_and_points();
        &self.cached_bc
    }

    /// The largest squared norm among the vertices of this simplex.
    pub fn max_vertex(&self) -> Real {
        self.vertices()
            .iter()
            .map(|v| v.point.coords.norm_squared())
            .fold(0.0, Real::max)
    }

    /// Checks if `w` is already (nearly) a vertex of this simplex, or is the last vertex added.
    pub fn in_simplex(&self, w: &Point<Real>) -> bool {
        let found = self
            .vertices()
            .iter()
            .any(|v| na::distance_squared(&v.point, w) <= self.equal_vertex_threshold);

        // The last vertex may already have been removed by the reduction.
        found || *w == self.last_w
    }

    fn update_closest_vector_and_points(&mut self) -> bool {
        if !self.needs_update {
            return self.cached_valid_closest;
        }

        self.cached_bc.reset();
        self.needs_update = false;

        match self.num_vertices {
            0 => self.cached_valid_closest = false,
            1 => {
                self.cached_p1 = self.vertices[0].orig1;
                self.cached_p2 = self.vertices[0].orig2;
                self.cached_v = self.cached_p1 - self.cached_p2;
                self.cached_bc.set_barycentric(1.0, 0.0, 0.0, 0.0);
                self.cached_bc.used_vertices = UsedVertices::A;
                self.cached_valid_closest = self.cached_bc.is_valid();
            }
            2 => {
                let from = self.vertices[0].point;
                let to = self.vertices[1].point;
                let v = to - from;
                let mut t = v.dot(&-from.coords);

                if t > 0.0 {
                    let dot_vv = v.norm_squared();
                    if t < dot_vv {
                        t /= dot_vv;
                        self.cached_bc.used_vertices = UsedVertices::A | UsedVertices::B;
                    } else {
                        t = 1.0;
                        self.cached_bc.used_vertices = UsedVertices::B;
                    }
                } else {
                    t = 0.0;
                    self.cached_bc.used_vertices = UsedVertices::A;
                }

                self.cached_bc.set_barycentric(1.0 - t, t, 0.0, 0.0);
                self.cached_bc.closest_point = from + v * t;

                let [a, b, ..] = self.vertices;
                self.cached_p1 = a.orig1 + (b.orig1 - a.orig1) * t;
                self.cached_p2 = a.orig2 + (b.orig2 - a.orig2) * t;
                self.cached_v = self.cached_p1 - self.cached_p2;

                self.reduce_vertices(self.cached_bc.used_vertices);
                self.cached_valid_closest = self.cached_bc.is_valid();
            }
            3 => {
                let [a, b, c, _] = self.vertices;
                closest_pt_origin_triangle(&a.point, &b.point, &c.point, &mut self.cached_bc);
                self.combine_cached_points(&[a, b, c]);
                self.reduce_vertices(self.cached_bc.used_vertices);
                self.cached_valid_closest = self.cached_bc.is_valid();
            }
            4 => {
                let [a, b, c, d] = self.vertices;
                let has_separation = closest_pt_origin_tetrahedron(
                    &a.point,
                    &b.point,
                    &c.point,
                    &d.point,
                    &mut self.cached_bc,
                );

                if has_separation {
                    self.combine_cached_points(&[a, b, c, d]);
                    self.reduce_vertices(self.cached_bc.used_vertices);
                } else if self.cached_bc.degenerate {
                    log::debug!("Affinely dependent tetrahedron in the simplex solver.");
                    self.cached_valid_closest = false;
                    return false;
                } else {
                    // The origin is inside the tetrahedron.
                    self.cached_valid_closest = true;
                    self.cached_v = Vector::zeros();
                    return true;
                }

                self.cached_valid_closest = self.cached_bc.is_valid();
            }
            _ => {
                debug_assert!(false, "A simplex cannot have more than 4 vertices.");
                self.cached_valid_closest = false;
            }
        }

        self.cached_valid_closest
    }

    fn combine_cached_points(&mut self, pts: &[CSOPoint]) {
        let mut p1 = Vector::zeros();
        let mut p2 = Vector::zeros();

        for (pt, bc) in pts.iter().zip(self.cached_bc.barycentric.iter()) {
            p1 += pt.orig1.coords * *bc;
            p2 += pt.orig2.coords * *bc;
        }

        self.cached_p1 = Point::from(p1);
        self.cached_p2 = Point::from(p2);
        self.cached_v = p1 - p2;
    }
}

/// Tests on which side of the plane `abc` the origin lies, relative to the vertex `d`.
pub fn origin_outside_of_plane(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    d: &Point<Real>,
) -> PlaneSide {
    let normal = (b - a).cross(&(c - a));
    let sign_p = (-a.coords).dot(&normal);
    let sign_d = (d - a).dot(&normal);

    if sign_d * sign_d < 1.0e-4 * 1.0e-4 {
        PlaneSide::Degenerate
    } else if sign_p * sign_d < 0.0 {
        PlaneSide::Outside
    } else {
        PlaneSide::Inside
    }
}

/// Computes the point of the triangle `abc` closest to the origin.
///
/// Always succeeds. The result is written to `result` which is reset first.
pub fn closest_pt_origin_triangle(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    result: &mut SubSimplexClosestResult,
) {
    result.used_vertices = UsedVertices::empty();

    let ab = b - a;
    let ac = c - a;
    let ap = -a.coords;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);

    if d1 <= 0.0 && d2 <= 0.0 {
        result.closest_point = *a;
        result.used_vertices = UsedVertices::A;
        result.set_barycentric(1.0, 0.0, 0.0, 0.0);
        return;
    }

    let bp = -b.coords;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);

    if d3 >= 0.0 && d4 <= d3 {
        result.closest_point = *b;
        result.used_vertices = UsedVertices::B;
        result.set_barycentric(0.0, 1.0, 0.0, 0.0);
        return;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        result.closest_point = a + ab * v;
        result.used_vertices = UsedVertices::A | UsedVertices::B;
        result.set_barycentric(1.0 - v, v, 0.0, 0.0);
        return;
    }

    let cp = -c.coords;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);

    if d6 >= 0.0 && d5 <= d6 {
        result.closest_point = *c;
        result.used_vertices = UsedVertices::C;
        result.set_barycentric(0.0, 0.0, 1.0, 0.0);
        return;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        result.closest_point = a + ac * w;
        result.used_vertices = UsedVertices::A | UsedVertices::C;
        result.set_barycentric(1.0 - w, 0.0, w, 0.0);
        return;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        result.closest_point = b + (c - b) * w;
        result.used_vertices = UsedVertices::B | UsedVertices::C;
        result.set_barycentric(0.0, 1.0 - w, w, 0.0);
        return;
    }

    // Face region.
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;

    result.closest_point = a + ab * v + ac * w;
    result.used_vertices = UsedVertices::A | UsedVertices::B | UsedVertices::C;
    result.set_barycentric(1.0 - v - w, v, w, 0.0);
}

/// Computes the point of the tetrahedron `abcd` closest to the origin.
///
/// Returns `false` if the origin is inside the tetrahedron, or if the tetrahedron is
/// degenerate (in which case `result.degenerate` is set).
pub fn closest_pt_origin_tetrahedron(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    d: &Point<Real>,
    result: &mut SubSimplexClosestResult,
) -> bool {
    result.closest_point = Point::origin();
    result.used_vertices = UsedVertices::all();

    let outside_abc = origin_outside_of_plane(a, b, c, d);
    let outside_acd = origin_outside_of_plane(a, c, d, b);
    let outside_adb = origin_outside_of_plane(a, d, b, c);
    let outside_bdc = origin_outside_of_plane(b, d, c, a);
    let sides = [outside_abc, outside_acd, outside_adb, outside_bdc];

    if sides.contains(&PlaneSide::Degenerate) {
        result.degenerate = true;
        return false;
    }

    if !sides.contains(&PlaneSide::Outside) {
        return false;
    }

    let mut best_sq_dist = Real::MAX;
    let mut tmp = SubSimplexClosestResult::default();

    // Each face with the mapping from the face's barycentrics to the tetrahedron's.
    let faces = [
        (outside_abc, [a, b, c], [0, 1, 2]),
        (outside_acd, [a, c, d], [0, 2, 3]),
        (outside_adb, [a, d, b], [0, 3, 1]),
        (outside_bdc, [b, d, c], [1, 3, 2]),
    ];
    let flags = [
        UsedVertices::A,
        UsedVertices::B,
        UsedVertices::C,
        UsedVertices::D,
    ];

    for (side, [p0, p1, p2], ids) in faces {
        if side != PlaneSide::Outside {
            continue;
        }

        closest_pt_origin_triangle(p0, p1, p2, &mut tmp);
        let sq_dist = tmp.closest_point.coords.norm_squared();

        if sq_dist < best_sq_dist {
            best_sq_dist = sq_dist;
            result.closest_point = tmp.closest_point;
            result.used_vertices = UsedVertices::empty();
            result.barycentric = [0.0; 4];

            for (k, id) in ids.iter().enumerate() {
                result.barycentric[*id] = tmp.barycentric[k];
                if tmp.used_vertices.contains(flags[k]) {
                    result.used_vertices |= flags[*id];
                }
            }
        }
    }

    true
}
