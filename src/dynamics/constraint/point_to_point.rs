use crate::dynamics::{RigidBody, RigidBodyHandle, RigidBodySet, TypedConstraint};
use crate::math::{Point, Real, Vector};

/// The tuning of a [`Point2PointConstraint`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ConstraintSetting {
    /// The ratio of the positional error corrected at each step.
    pub tau: Real,
    /// The ratio of the relative velocity removed at each iteration.
    pub damping: Real,
    /// The maximum impulse of an iteration along each axis. Zero means unbounded.
    pub impulse_clamp: Real,
}

impl Default for ConstraintSetting {
    fn default() -> Self {
        Self {
            tau: 0.3,
            damping: 1.0,
            impulse_clamp: 0.0,
        }
    }
}

/// A ball-socket joint keeping a point of the first body on a point of the second one.
#[derive(Clone, Debug)]
pub struct Point2PointConstraint {
    body_a: RigidBodyHandle,
    body_b: Option<RigidBodyHandle>,
    pivot_in_a: Point<Real>,
    /// Local to `body_b`, or in world-space if attached to the world.
    pivot_in_b: Point<Real>,
    jac_diag_ab_inv: [Real; 3],
    applied_impulse: Real,
    /// The tuning of this joint.
    pub setting: ConstraintSetting,
}

impl Point2PointConstraint {
    /// A joint between two bodies, at the given local pivots.
    pub fn new(
        body_a: RigidBodyHandle,
        body_b: RigidBodyHandle,
        pivot_in_a: Point<Real>,
        pivot_in_b: Point<Real>,
    ) -> Self {
        Self {
            body_a,
            body_b: Some(body_b),
            pivot_in_a,
            pivot_in_b,
            jac_diag_ab_inv: [0.0; 3],
            applied_impulse: 0.0,
            setting: ConstraintSetting::default(),
        }
    }

    /// A joint between a body and the world, keeping the local pivot of the body at its
    /// current world-space position.
    pub fn new_single(body_a: &RigidBody, handle_a: RigidBodyHandle, pivot_in_a: Point<Real>) -> Self {
        Self {
            body_a: handle_a,
            body_b: None,
            pivot_in_a,
            pivot_in_b: body_a.center_of_mass_transform() * pivot_in_a,
            jac_diag_ab_inv: [0.0; 3],
            applied_impulse: 0.0,
            setting: ConstraintSetting::default(),
        }
    }

    /// The pivot in the local-space of the first body.
    pub fn pivot_in_a(&self) -> &Point<Real> {
        &self.pivot_in_a
    }

    /// The pivot in the local-space of the second body, or in world-space.
    pub fn pivot_in_b(&self) -> &Point<Real> {
        &self.pivot_in_b
    }

    /// Sets the pivot in the local-space of the first body.
    pub fn set_pivot_a(&mut self, pivot: Point<Real>) {
        self.pivot_in_a = pivot;
    }

    /// Sets the pivot in the local-space of the second body, or in world-space.
    pub fn set_pivot_b(&mut self, pivot: Point<Real>) {
        self.pivot_in_b = pivot;
    }

    fn pivots(&self, a: &RigidBody, b: Option<&RigidBody>) -> (Point<Real>, Point<Real>) {
        let pivot_a = a.center_of_mass_transform() * self.pivot_in_a;
        let pivot_b = match b {
            Some(b) => b.center_of_mass_transform() * self.pivot_in_b,
            None => self.pivot_in_b,
        };
        (pivot_a, pivot_b)
    }
}

fn axis(i: usize) -> Vector<Real> {
    let mut normal = Vector::zeros();
    normal[i] = 1.0;
    normal
}

impl TypedConstraint for Point2PointConstraint {
    fn body_a(&self) -> RigidBodyHandle {
        self.body_a
    }

    fn body_b(&self) -> Option<RigidBodyHandle> {
        self.body_b
    }

    fn build_jacobian(&mut self, bodies: &RigidBodySet) {
        self.applied_impulse = 0.0;

        let Some(a) = bodies.get(self.body_a) else {
            return;
        };
        let b = self.body_b.and_then(|h| bodies.get(h));
        let (pivot_a, pivot_b) = self.pivots(a, b);

        for (i, diag_inv) in self.jac_diag_ab_inv.iter_mut().enumerate() {
            let normal = axis(i);
            let diag = a.compute_impulse_denominator(&pivot_a, &normal)
                + b.map(|b| b.compute_impulse_denominator(&pivot_b, &normal))
                    .unwrap_or(0.0);
            *diag_inv = if diag > 0.0 { 1.0 / diag } else { 0.0 };
        }
    }

    fn solve_constraint(&mut self, bodies: &mut RigidBodySet, dt: Real) {
        let (a, mut b) = match self.body_b {
            Some(handle_b) => match bodies.get_pair_mut(self.body_a, handle_b) {
                Some((a, b)) => (a, Some(b)),
                None => return,
            },
            None => match bodies.get_mut(self.body_a) {
                Some(a) => (a, None),
                None => return,
            },
        };

        let (pivot_a, pivot_b) = self.pivots(a, b.as_deref());
        let rel_pos1 = pivot_a - a.center_of_mass_position();
        let rel_pos2 = b
            .as_ref()
            .map(|b| pivot_b - b.center_of_mass_position())
            .unwrap_or_else(Vector::zeros);

        for (i, jac_diag_ab_inv) in self.jac_diag_ab_inv.iter().enumerate() {
            let normal = axis(i);

            let vel1 = a.velocity_in_local_point(&rel_pos1);
            let vel2 = b
                .as_ref()
                .map(|b| b.velocity_in_local_point(&rel_pos2))
                .unwrap_or_else(Vector::zeros);
            let rel_vel = normal.dot(&(vel1 - vel2));

            let depth = -(pivot_a - pivot_b).dot(&normal);

            let mut impulse = depth * self.setting.tau / dt * jac_diag_ab_inv
                - self.setting.damping * rel_vel * jac_diag_ab_inv;

            let clamp = self.setting.impulse_clamp;
            if clamp > 0.0 {
                impulse = impulse.clamp(-clamp, clamp);
            }

            self.applied_impulse += impulse;
            let impulse_vector = normal * impulse;
            a.apply_impulse(&impulse_vector, &rel_pos1);
            if let Some(b) = b.as_mut() {
                b.apply_impulse(&-impulse_vector, &rel_pos2);
            }
        }
    }

    fn applied_impulse(&self) -> Real {
        self.applied_impulse
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dynamics::RigidBodyConstructionInfo;
    use crate::math::Isometry;
    use crate::shape::SharedShape;

    #[test]
    fn pendulum_pivot_is_restored() {
        let mut bodies = RigidBodySet::new();
        let body = RigidBody::new(
            RigidBodyConstructionInfo::from_shape(1.0, SharedShape::ball(0.2))
                .with_transform(Isometry::translation(0.0, -1.0, 0.0)),
        );
        let pivot = Point::new(0.0, 1.0, 0.0);
        let mut joint = Point2PointConstraint::new_single(&body, RigidBodyHandle(0), pivot);
        let handle = bodies.insert(body);
        assert_eq!(handle, RigidBodyHandle(0));

        // Push the body away from its pivot.
        bodies[handle].set_linvel(Vector::new(3.0, 0.0, 0.0));

        joint.build_jacobian(&bodies);
        for _ in 0..20 {
            joint.solve_constraint(&mut bodies, 1.0 / 60.0);
        }

        // The pivot point doesn't move anymore.
        let rel_pos = pivot.coords;
        let vel = bodies[handle].velocity_in_local_point(&rel_pos);
        assert_relative_eq!(vel, Vector::zeros(), epsilon = 1.0e-3);
        assert!(joint.applied_impulse().abs() > 0.0);
    }
}
