use crate::dynamics::solver::ConstraintSolver;
use crate::dynamics::{IntegrationParameters, RigidBody, RigidBodySet, TypedConstraint};
use crate::math::{Point, Real, Vector};
use crate::query::PersistentManifold;
use crate::utils;
use alloc::vec::Vec;

const DENOMINATOR_EPSILON: Real = 1.0e-9;

#[derive(Copy, Clone, Debug)]
struct ContactConstraint {
    manifold: usize,
    point: usize,
    normal: Vector<Real>,
    rel_pos1: Vector<Real>,
    rel_pos2: Vector<Real>,
    jac_diag_inv: Real,
    target_velocity: Real,
    friction: Real,
    friction_dirs: [Vector<Real>; 2],
    friction_jac_diag_inv: [Real; 2],
    applied_impulse: Real,
    applied_friction: [Real; 2],
}

/// A projected Gauss-Seidel solver working on velocities.
///
/// Contacts are solved as non-penetration constraints with accumulated impulses clamped to
/// be positive, a Baumgarte bias correcting a fraction of the penetration, and speculative
/// handling of separated points. Friction is solved along two tangent directions, bounded by
/// the normal impulse. Normal impulses of the previous step are reused to warm start.
#[derive(Clone, Debug, Default)]
pub struct SequentialImpulseConstraintSolver {
    contacts: Vec<ContactConstraint>,
}

impl SequentialImpulseConstraintSolver {
    /// Creates a new solver.
    pub fn new() -> Self {
        Self::default()
    }

    fn prepare_contacts(
        &mut self,
        bodies: &mut RigidBodySet,
        manifolds: &mut [&mut PersistentManifold],
        params: &IntegrationParameters,
        dt: Real,
    ) {
        self.contacts.clear();

        for (manifold_id, manifold) in manifolds.iter_mut().enumerate() {
            let Some((a, b)) = bodies.get_pair_mut(manifold.body0, manifold.body1) else {
                continue;
            };

            for (point_id, pt) in manifold.points_mut().iter_mut().enumerate() {
                let normal = pt.normal_world_on_b;
                let pos_a = pt.position_world_on_a;
                let pos_b = pt.position_world_on_b;
                let rel_pos1 = pos_a - a.center_of_mass_position();
                let rel_pos2 = pos_b - b.center_of_mass_position();

                let jac_diag_inv = inv_denominator(a, b, &pos_a, &pos_b, &normal);

                let vel = a.velocity_in_local_point(&rel_pos1) - b.velocity_in_local_point(&rel_pos2);
                let rel_vel = normal.dot(&vel);

                let restitution = (-rel_vel * pt.combined_restitution).max(0.0);
                let target_velocity = if pt.distance > 0.0 {
                    // Speculative contact: allow closing the gap during this step.
                    -pt.distance / dt
                } else {
                    restitution.max(-pt.distance * params.erp / dt)
                };

                let lateral = vel - normal * rel_vel;
                let lateral_norm2 = lateral.norm_squared();
                let (dir1, dir2) = if lateral_norm2 > Real::EPSILON {
                    let dir1 = lateral / lateral_norm2.sqrt();
                    (dir1, dir1.cross(&normal).normalize())
                } else {
                    utils::plane_space(&normal)
                };

                pt.lateral_friction_dir1 = dir1;
                pt.lateral_friction_dir2 = dir2;
                pt.applied_impulse *= params.warmstarting_factor;
                pt.applied_impulse_lateral1 = 0.0;
                pt.applied_impulse_lateral2 = 0.0;

                let warmstart = normal * pt.applied_impulse;
                a.apply_impulse(&warmstart, &rel_pos1);
                b.apply_impulse(&-warmstart, &rel_pos2);

                self.contacts.push(ContactConstraint {
                    manifold: manifold_id,
                    point: point_id,
                    normal,
                    rel_pos1,
                    rel_pos2,
                    jac_diag_inv,
                    target_velocity,
                    friction: pt.combined_friction,
                    friction_dirs: [dir1, dir2],
                    friction_jac_diag_inv: [
                        inv_denominator(a, b, &pos_a, &pos_b, &dir1),
                        inv_denominator(a, b, &pos_a, &pos_b, &dir2),
                    ],
                    applied_impulse: pt.applied_impulse,
                    applied_friction: [0.0; 2],
                });
            }
        }
    }
}

fn inv_denominator(
    a: &RigidBody,
    b: &RigidBody,
    pos_a: &Point<Real>,
    pos_b: &Point<Real>,
    dir: &Vector<Real>,
) -> Real {
    let denom = a.compute_impulse_denominator(pos_a, dir) + b.compute_impulse_denominator(pos_b, dir);
    if denom > DENOMINATOR_EPSILON {
        1.0 / denom
    } else {
        0.0
    }
}

fn solve_contact(
    contact: &mut ContactConstraint,
    manifolds: &[&mut PersistentManifold],
    bodies: &mut RigidBodySet,
) -> Real {
    let manifold = &manifolds[contact.manifold];
    let Some((a, b)) = bodies.get_pair_mut(manifold.body0, manifold.body1) else {
        return 0.0;
    };

    let vel = a.velocity_in_local_point(&contact.rel_pos1) - b.velocity_in_local_point(&contact.rel_pos2);
    let rel_vel = contact.normal.dot(&vel);

    // Normal impulse, accumulated and clamped to be repulsive.
    let delta = (contact.target_velocity - rel_vel) * contact.jac_diag_inv;
    let new_impulse = (contact.applied_impulse + delta).max(0.0);
    let delta = new_impulse - contact.applied_impulse;
    contact.applied_impulse = new_impulse;

    let impulse = contact.normal * delta;
    a.apply_impulse(&impulse, &contact.rel_pos1);
    b.apply_impulse(&-impulse, &contact.rel_pos2);

    // Friction impulses, bounded by the normal impulse.
    let limit = contact.friction * contact.applied_impulse;
    let mut residual = delta.abs();

    for k in 0..2 {
        let dir = contact.friction_dirs[k];
        let vel = a.velocity_in_local_point(&contact.rel_pos1)
            - b.velocity_in_local_point(&contact.rel_pos2);
        let delta = -dir.dot(&vel) * contact.friction_jac_diag_inv[k];
        let new_impulse = (contact.applied_friction[k] + delta).clamp(-limit, limit);
        let delta = new_impulse - contact.applied_friction[k];
        contact.applied_friction[k] = new_impulse;

        let impulse = dir * delta;
        a.apply_impulse(&impulse, &contact.rel_pos1);
        b.apply_impulse(&-impulse, &contact.rel_pos2);
        residual += delta.abs();
    }

    residual
}

impl ConstraintSolver for SequentialImpulseConstraintSolver {
    fn solve_group(
        &mut self,
        bodies: &mut RigidBodySet,
        manifolds: &mut [&mut PersistentManifold],
        constraints: &mut [&mut dyn TypedConstraint],
        params: &IntegrationParameters,
        dt: Real,
    ) -> Real {
        if manifolds.is_empty() && constraints.is_empty() {
            return 0.0;
        }

        self.prepare_contacts(bodies, manifolds, params, dt);

        for constraint in constraints.iter_mut() {
            constraint.build_jacobian(bodies);
        }

        let mut residual = 0.0;

        for _ in 0..params.solver_iterations {
            residual = 0.0;

            for constraint in constraints.iter_mut() {
                constraint.solve_constraint(bodies, dt);
            }

            for contact in &mut self.contacts {
                residual += solve_contact(contact, manifolds, bodies);
            }
        }

        for contact in &self.contacts {
            let pt = &mut manifolds[contact.manifold].points_mut()[contact.point];
            pt.applied_impulse = contact.applied_impulse;
            pt.applied_impulse_lateral1 = contact.applied_friction[0];
            pt.applied_impulse_lateral2 = contact.applied_friction[1];
        }

        residual
    }

    fn reset(&mut self) {
        self.contacts.clear();
    }
}
