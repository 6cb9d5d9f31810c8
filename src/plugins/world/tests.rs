use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::test_utils::run_system_once;
use crate::common::tunables::{ArenaTunables, Tunables};

#[test]
fn spawns_walls_on_enter() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    run_system_once(&mut world, super::spawn_arena);

    let walls = world
        .query::<(&Name, &RigidBody)>()
        .iter(&world)
        .filter(|(n, rb)| n.as_str().starts_with("Wall") && matches!(**rb, RigidBody::Static))
        .count();
    assert_eq!(walls, 4);
}

#[test]
fn walls_sit_just_outside_the_arena() {
    let arena = ArenaTunables {
        half_width: 100.0,
        half_height: 50.0,
        wall_thickness: 10.0,
    };
    let rects = super::wall_rects(&arena);

    let (_, top, top_size) = rects[0];
    assert_eq!(top.y - top_size.y * 0.5, 50.0);
    let (_, right, right_size) = rects[3];
    assert_eq!(right.x - right_size.x * 0.5, 100.0);
    assert_eq!(top_size.x, 220.0);
}
