// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
//! Body integration through `World::update`.

use rewind_physics::{Body, BodyKind, Vec2, World, WorldConfig, DEFAULT_GRAVITY};

const EPS: f32 = 1e-6;

fn approx(a: Vec2, b: Vec2) -> bool {
    (a.x - b.x).abs() <= EPS && (a.y - b.y).abs() <= EPS
}

#[test]
fn unit_mass_falls_under_gravity() {
    let mut world = World::new(WorldConfig::default());
    assert_eq!(world.gravity(), DEFAULT_GRAVITY);
    let h = world.create_body();
    world.update(0.1);
    let body = world.body(h).expect("live body");
    assert!(approx(body.velocity, Vec2::new(0.0, -0.98)), "{body:?}");
    assert!(approx(body.position, Vec2::new(0.0, -0.098)), "{body:?}");
    assert_eq!(body.force_sum(), Vec2::ZERO);
}

#[test]
fn forces_scale_with_inverse_mass_and_reset() {
    let mut world = World::with_gravity(Vec2::ZERO, 0);
    let h = world
        .insert_body(Body::new(2.0, BodyKind::Dynamic).expect("mass"))
        .expect("valid body");
    world.body_mut(h).expect("live").apply_force(Vec2::new(4.0, 0.0));
    world.update(0.5);
    let body = world.body(h).expect("live");
    assert_eq!(body.velocity, Vec2::new(1.0, 0.0));
    assert_eq!(body.position, Vec2::new(0.5, 0.0));
    assert_eq!(body.force_sum(), Vec2::ZERO);

    world.update(0.5);
    assert_eq!(world.body(h).expect("live").velocity, Vec2::new(1.0, 0.0));
}

#[test]
fn static_body_never_moves() {
    let mut world = World::default();
    let h = world
        .insert_body(Body::new(5.0, BodyKind::Static).expect("mass"))
        .expect("valid body");
    {
        let body = world.body_mut(h).expect("live");
        body.position = Vec2::new(3.0, 4.0);
        body.velocity = Vec2::new(1.0, 1.0);
        body.apply_force(Vec2::new(100.0, 100.0));
        body.apply_impulse(Vec2::new(-7.0, 0.0));
    }
    for _ in 0..10 {
        world.update(1.0 / 60.0);
    }
    let body = world.body(h).expect("live");
    assert_eq!(body.position, Vec2::new(3.0, 4.0));
    assert_eq!(body.velocity, Vec2::new(1.0, 1.0));
    assert_eq!(body.inv_mass(), 0.0);
}

#[test]
fn kinematic_body_follows_velocity_and_keeps_forces() {
    let mut world = World::default();
    let h = world.create_body();
    {
        let body = world.body_mut(h).expect("live");
        body.set_kind(BodyKind::Kinematic);
        body.velocity = Vec2::new(1.0, 0.0);
        body.apply_force(Vec2::new(100.0, 0.0));
    }
    world.update(0.5);
    world.update(0.5);
    let body = world.body(h).expect("live");
    assert_eq!(body.position, Vec2::new(1.0, 0.0));
    assert_eq!(body.velocity, Vec2::new(1.0, 0.0));
    assert_eq!(body.force_sum(), Vec2::new(100.0, 0.0));
}

#[test]
fn damping_slows_dynamic_bodies() {
    let mut world = World::with_gravity(Vec2::ZERO, 0);
    let h = world.create_body();
    {
        let body = world.body_mut(h).expect("live");
        body.damping = 1.0;
        body.velocity = Vec2::new(8.0, 0.0);
    }
    world.update(0.5);
    assert_eq!(world.body(h).expect("live").velocity, Vec2::new(4.0, 0.0));
}

#[test]
fn gravity_can_be_changed_between_steps() {
    let mut world = World::with_gravity(Vec2::ZERO, 4);
    let h = world.create_body();
    world.update(1.0);
    assert_eq!(world.body(h).expect("live").position, Vec2::ZERO);
    world.set_gravity(Vec2::new(2.0, 0.0));
    world.update(1.0);
    let body = world.body(h).expect("live");
    assert_eq!(body.velocity, Vec2::new(2.0, 0.0));
    assert_eq!(world.step_count(), 2);
}
