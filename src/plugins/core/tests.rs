use bevy::prelude::*;

use crate::common::rng::SimRng;
use crate::common::tunables::Tunables;
use crate::plugins::core;

#[test]
fn inserts_resources() {
    let mut app = App::new();
    core::plugin(&mut app);
    assert!(app.world().get_resource::<Tunables>().is_some());
    assert!(app.world().get_resource::<SimRng>().is_some());
    assert!(app.world().get_resource::<ClearColor>().is_some());
}

#[test]
fn keeps_preinserted_tunables_and_seeds_from_them() {
    let mut app = App::new();
    app.insert_resource(Tunables {
        seed: Some(42),
        pixels_per_meter: 8.0,
        ..default()
    });
    core::plugin(&mut app);

    assert_eq!(app.world().resource::<Tunables>().pixels_per_meter, 8.0);
    assert_eq!(app.world().resource::<SimRng>().seed(), Some(42));
}
