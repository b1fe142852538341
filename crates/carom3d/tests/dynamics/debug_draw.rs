use carom3d::dynamics::{
    DebugDrawModes, DebugRenderBackend, DiscreteDynamicsWorld, RigidBody,
    RigidBodyConstructionInfo,
};
use carom3d::math::{Isometry, Point, Real, Vector};
use carom3d::shape::SharedShape;

#[derive(Default)]
struct Recorder {
    mode: DebugDrawModes,
    lines: usize,
    contacts: usize,
    texts: Vec<String>,
}

impl DebugRenderBackend for Recorder {
    fn draw_line(&mut self, _: &Point<Real>, _: &Point<Real>, _: &Vector<Real>) {
        self.lines += 1;
    }

    fn draw_contact_point(
        &mut self,
        _: &Point<Real>,
        normal_on_b: &Vector<Real>,
        distance: Real,
        _: u32,
        _: &Vector<Real>,
    ) {
        assert_relative_eq!(normal_on_b.y.abs(), 1.0, epsilon = 1.0e-3);
        assert!(distance <= 0.02);
        self.contacts += 1;
    }

    fn draw_3d_text(&mut self, _: &Point<Real>, text: &str) {
        self.texts.push(text.to_string());
    }

    fn report_error_warning(&mut self, warning: &str) {
        panic!("unexpected warning: {warning}");
    }

    fn debug_mode(&self) -> DebugDrawModes {
        self.mode
    }
}

fn resting_ball_world() -> DiscreteDynamicsWorld {
    let mut world = DiscreteDynamicsWorld::default();
    let _ = world.add_rigid_body(RigidBody::new(
        RigidBodyConstructionInfo::from_shape(0.0, SharedShape::cuboid(50.0, 0.5, 50.0))
            .with_transform(Isometry::translation(0.0, -0.5, 0.0)),
    ));
    let _ = world.add_rigid_body(RigidBody::new(
        RigidBodyConstructionInfo::from_shape(1.0, SharedShape::ball(0.5))
            .with_transform(Isometry::translation(0.0, 0.5, 0.0)),
    ));
    let _ = world.step_simulation(1.0 / 60.0, 1, 1.0 / 60.0);
    world
}

#[test]
fn debug_mode_selects_what_is_drawn() {
    let world = resting_ball_world();

    let mut nothing = Recorder::default();
    world.debug_draw_world(&mut nothing);
    assert_eq!(nothing.lines, 0);
    assert_eq!(nothing.contacts, 0);
    assert!(nothing.texts.is_empty());

    let mut everything = Recorder {
        mode: DebugDrawModes::DRAW_WIREFRAME
            | DebugDrawModes::DRAW_AABB
            | DebugDrawModes::DRAW_CONTACT_POINTS
            | DebugDrawModes::DRAW_TEXT,
        ..Recorder::default()
    };
    world.debug_draw_world(&mut everything);

    // Three frame axes and twelve box edges per body.
    assert_eq!(everything.lines, 2 * (3 + 12));
    assert!(everything.contacts >= 1);
    assert_eq!(everything.texts, vec!["Active".to_string(); 2]);
}
