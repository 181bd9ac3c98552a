//! Physics contacts to controller contact events
//!
//! Rapier only reports when touching starts and stops. While a pair keeps
//! touching we repeat a `Persist` contact on a fixed cadence so hazards keep
//! hurting.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use controller::{
    ContactEvent, ContactPhase, ContactTag, ControllerEvent, ControllerState, ObjectId,
};
use std::collections::{HashMap, HashSet};

use crate::player::{ControllerSignal, PlayerBody};

/// Seconds between repeated contacts for a pair that stays touching
pub const CONTACT_PERSIST_INTERVAL: f32 = 0.5;

/// Tag a scene object reports when touched
#[derive(Component, Clone, Debug)]
pub struct SceneTag(pub &'static str);

/// Pairs currently touching, and where their objects live
#[derive(Resource, Default, Debug)]
pub struct ActiveContacts {
    touching: HashSet<(Entity, Entity)>,
    objects: HashMap<ObjectId, Entity>,
    since_persist: f32,
}

impl ActiveContacts {
    fn begin(&mut self, player: Entity, other: Entity) -> ObjectId {
        self.touching.insert((player, other));
        let id = ObjectId(other.to_bits());
        self.objects.insert(id, other);
        id
    }

    fn end(&mut self, player: Entity, other: Entity) {
        self.touching.remove(&(player, other));
        if !self.touching.iter().any(|(_, touched)| *touched == other) {
            self.objects.retain(|_, entity| *entity != other);
        }
    }

    /// Forget an object that is leaving the scene
    fn forget(&mut self, id: ObjectId) -> Option<Entity> {
        let entity = self.objects.remove(&id)?;
        self.touching.retain(|(_, other)| *other != entity);
        Some(entity)
    }

    /// Advance the repeat clock; true when persisting contacts are due.
    fn persist_due(&mut self, delta: f32) -> bool {
        if self.touching.is_empty() {
            self.since_persist = 0.0;
            return false;
        }
        self.since_persist += delta;
        if self.since_persist >= CONTACT_PERSIST_INTERVAL {
            self.since_persist -= CONTACT_PERSIST_INTERVAL;
            true
        } else {
            false
        }
    }
}

/// Put the player first in a collision pair, if one of them is the player
fn order_pair(
    a: Entity,
    b: Entity,
    players: &Query<(), With<PlayerBody>>,
) -> Option<(Entity, Entity)> {
    if players.contains(a) {
        Some((a, b))
    } else if players.contains(b) {
        Some((b, a))
    } else {
        None
    }
}

fn deliver(
    states: &mut Query<&mut ControllerState, With<PlayerBody>>,
    signals: &mut MessageWriter<ControllerSignal>,
    player: Entity,
    contact: ContactEvent,
) {
    let Ok(mut state) = states.get_mut(player) else {
        return;
    };
    debug!("Contact {:?} with {}", contact.phase, contact.tag.as_str());
    for event in state.on_contact(&contact) {
        signals.write(ControllerSignal(event));
    }
}

/// Turn rapier collision starts into `Begin` contacts
pub fn collect_contacts(
    mut collisions: MessageReader<CollisionEvent>,
    mut active: ResMut<ActiveContacts>,
    players: Query<(), With<PlayerBody>>,
    tags: Query<&SceneTag>,
    mut states: Query<&mut ControllerState, With<PlayerBody>>,
    mut signals: MessageWriter<ControllerSignal>,
) {
    for collision in collisions.read() {
        match *collision {
            CollisionEvent::Started(a, b, _) => {
                let Some((player, other)) = order_pair(a, b, &players) else {
                    continue;
                };
                let Ok(tag) = tags.get(other) else {
                    continue;
                };
                let object = active.begin(player, other);
                let contact =
                    ContactEvent::new(ContactTag::from_tag(tag.0), object, ContactPhase::Begin);
                deliver(&mut states, &mut signals, player, contact);
            }
            CollisionEvent::Stopped(a, b, _) => {
                if let Some((player, other)) = order_pair(a, b, &players) {
                    active.end(player, other);
                }
            }
        }
    }
}

/// Re-deliver contacts for pairs that are still touching
pub fn repeat_persisting_contacts(
    time: Res<Time>,
    mut active: ResMut<ActiveContacts>,
    tags: Query<&SceneTag>,
    mut states: Query<&mut ControllerState, With<PlayerBody>>,
    mut signals: MessageWriter<ControllerSignal>,
) {
    if !active.persist_due(time.delta_secs()) {
        return;
    }
    let pairs: Vec<_> = active.touching.iter().copied().collect();
    for (player, other) in pairs {
        let Ok(tag) = tags.get(other) else {
            active.end(player, other);
            continue;
        };
        let contact = ContactEvent::new(
            ContactTag::from_tag(tag.0),
            ObjectId(other.to_bits()),
            ContactPhase::Persist,
        );
        deliver(&mut states, &mut signals, player, contact);
    }
}

/// Remove consumed pickups from the scene
pub fn despawn_consumed(
    mut commands: Commands,
    mut active: ResMut<ActiveContacts>,
    mut signals: MessageReader<ControllerSignal>,
) {
    for ControllerSignal(event) in signals.read() {
        let ControllerEvent::Destroy(id) = event else {
            continue;
        };
        let Some(entity) = active.forget(*id) else {
            warn!("Asked to destroy unknown object {:?}", id);
            continue;
        };
        if let Ok(mut entity_commands) = commands.get_entity(entity) {
            entity_commands.despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (Entity, Entity) {
        let mut world = World::new();
        (world.spawn_empty().id(), world.spawn_empty().id())
    }

    #[test]
    fn test_persist_only_while_touching() {
        let (player, crate_entity) = pair();
        let mut active = ActiveContacts::default();
        assert!(!active.persist_due(1.0));

        active.begin(player, crate_entity);
        assert!(!active.persist_due(0.3));
        assert!(active.persist_due(0.3));

        active.end(player, crate_entity);
        assert!(!active.persist_due(1.0));
    }

    #[test]
    fn test_end_forgets_untouched_objects() {
        let (player, lava) = pair();
        let mut active = ActiveContacts::default();
        let id = active.begin(player, lava);
        active.end(player, lava);

        assert!(active.objects.is_empty());
        assert_eq!(active.forget(id), None);
    }

    #[test]
    fn test_forget_drops_pair() {
        let (player, crate_entity) = pair();
        let mut active = ActiveContacts::default();
        let id = active.begin(player, crate_entity);

        assert_eq!(active.forget(id), Some(crate_entity));
        assert!(active.touching.is_empty());
        assert_eq!(active.forget(id), None);
    }
}
