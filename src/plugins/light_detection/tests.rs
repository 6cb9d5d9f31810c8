use super::*;

use crate::common::test_utils::{init_sim_messages, run_system_once};

fn entities(world: &mut World, n: usize) -> Vec<Entity> {
    (0..n).map(|_| world.spawn_empty().id()).collect()
}

#[test]
fn enter_and_exit_are_idempotent() {
    let mut world = World::new();
    let e = entities(&mut world, 2);
    let mut reg = LightRegistry::default();

    assert!(reg.on_enter(e[0]));
    assert!(!reg.on_enter(e[0]));
    assert!(reg.on_enter(e[1]));
    assert_eq!(reg.members(), &[e[0], e[1]]);

    assert!(reg.on_exit(e[0]));
    assert!(!reg.on_exit(e[0]));
    assert_eq!(reg.members(), &[e[1]]);
}

#[test]
fn nearest_skips_unplaceable_and_first_wins_ties() {
    let mut world = World::new();
    let e = entities(&mut world, 4);
    let mut reg = LightRegistry::default();
    assert_eq!(reg.nearest_in_light(Vec2::ZERO, |_| Some(Vec2::ZERO)), None);

    for &m in &e {
        reg.on_enter(m);
    }
    let positions = [
        None,
        Some(Vec2::new(5.0, 0.0)),
        Some(Vec2::new(-5.0, 0.0)),
        None,
    ];
    let position_of = |x: Entity| positions[e.iter().position(|m| *m == x)?];

    // e[1] and e[2] are equally far from the origin.
    assert_eq!(reg.nearest_in_light(Vec2::ZERO, position_of), Some(e[1]));
    assert_eq!(
        reg.nearest_in_light(Vec2::new(-4.0, 0.0), position_of),
        Some(e[2])
    );
}

#[test]
fn cone_is_symmetric_about_x() {
    let [apex, lower, upper] = cone_vertices(30.0, 100.0);
    assert_eq!(apex, Vec2::ZERO);
    assert!((lower.length() - 100.0).abs() < 1e-3);
    assert_eq!(lower.x, upper.x);
    assert_eq!(lower.y, -upper.y);
    assert!((upper.to_angle().to_degrees() - 15.0).abs() < 1e-3);
}

fn light_world() -> (World, Entity) {
    let mut world = World::new();
    init_sim_messages(&mut world);
    world.init_resource::<LightRegistry>();
    let light = world.spawn((LightVolume, Flashlight::default())).id();
    (world, light)
}

fn start(world: &mut World, a: Entity, b: Entity) {
    world.write_message(CollisionStart {
        collider1: a,
        collider2: b,
        body1: Some(a),
        body2: Some(b),
    });
}

fn end(world: &mut World, a: Entity, b: Entity) {
    world.write_message(CollisionEnd {
        collider1: a,
        collider2: b,
        body1: Some(a),
        body2: Some(b),
    });
}

#[test]
fn contacts_drive_registry_and_companion_flag() {
    let (mut world, light) = light_world();
    let enemy = world.spawn(Enemy).id();
    let companion = world.spawn(Illuminated::default()).id();

    start(&mut world, enemy, light);
    start(&mut world, light, companion);
    run_system_once(&mut world, track_light_contacts);

    assert!(world.resource::<LightRegistry>().contains(enemy));
    assert!(world.get::<Illuminated>(companion).unwrap().0);

    end(&mut world, light, enemy);
    end(&mut world, companion, light);
    run_system_once(&mut world, track_light_contacts);

    assert!(world.resource::<LightRegistry>().is_empty());
    assert!(!world.get::<Illuminated>(companion).unwrap().0);
}

#[test]
fn dead_and_despawned_enemies_are_purged() {
    let (mut world, light) = light_world();
    let dying = world.spawn(Enemy).id();
    let vanishing = world.spawn(Enemy).id();
    let staying = world.spawn(Enemy).id();

    for e in [dying, vanishing, staying] {
        start(&mut world, light, e);
    }
    run_system_once(&mut world, track_light_contacts);
    assert_eq!(world.resource::<LightRegistry>().len(), 3);

    world.entity_mut(dying).insert(Dead);
    world.despawn(vanishing);
    run_system_once(&mut world, track_light_contacts);

    assert_eq!(world.resource::<LightRegistry>().members(), &[staying]);
}

#[test]
fn contacts_not_involving_the_light_are_ignored() {
    let (mut world, _light) = light_world();
    let enemy = world.spawn(Enemy).id();
    let wall = world.spawn_empty().id();

    start(&mut world, enemy, wall);
    run_system_once(&mut world, track_light_contacts);

    assert!(world.resource::<LightRegistry>().is_empty());
}
