//! Reading avian collision messages as pairs of gameplay entities.

use avian2d::prelude::*;
use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContactSide {
    pub collider: Entity,
    pub body: Option<Entity>,
}

impl ContactSide {
    /// The entity gameplay components live on: the rigid body when there is one.
    #[inline]
    pub fn owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
pub fn sides_of_start(ev: &CollisionStart) -> (ContactSide, ContactSide) {
    (
        ContactSide {
            collider: ev.collider1,
            body: ev.body1,
        },
        ContactSide {
            collider: ev.collider2,
            body: ev.body2,
        },
    )
}

#[inline]
pub fn sides_of_end(ev: &CollisionEnd) -> (ContactSide, ContactSide) {
    (
        ContactSide {
            collider: ev.collider1,
            body: ev.body1,
        },
        ContactSide {
            collider: ev.collider2,
            body: ev.body2,
        },
    )
}

/// Orders a pair so the side matching `is_first` comes first. `None` unless exactly
/// one side matches.
#[inline]
pub fn split_pair(
    (a, b): (ContactSide, ContactSide),
    is_first: impl Fn(Entity) -> bool,
) -> Option<(ContactSide, ContactSide)> {
    match (is_first(a.owner()), is_first(b.owner())) {
        (true, false) => Some((a, b)),
        (false, true) => Some((b, a)),
        _ => None,
    }
}
