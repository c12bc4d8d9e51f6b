//! Insertion-ordered actor storage with a single watched actor.

use std::time::Duration;

use labyrinth_core::{ActorId, ActorKind, ActorPhase, ActorSnapshot, Coordinate, Direction};

#[derive(Clone, Debug)]
pub(crate) struct Actor {
    pub(crate) id: ActorId,
    pub(crate) kind: ActorKind,
    pub(crate) coordinate: Coordinate,
    pub(crate) facing: Direction,
    pub(crate) requested: Direction,
    pub(crate) phase: ActorPhase,
}

impl Actor {
    fn new(id: ActorId, kind: ActorKind, coordinate: Coordinate) -> Self {
        let facing = kind.initial_facing();
        Self {
            id,
            kind,
            coordinate,
            facing,
            requested: facing,
            phase: ActorPhase::Ready,
        }
    }

    pub(crate) fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            id: self.id,
            kind: self.kind,
            coordinate: self.coordinate,
            facing: self.facing,
            requested: self.requested,
            phase: self.phase,
        }
    }

    /// Consumes `dt` from the running step animation.
    pub(crate) fn advance_clock(&mut self, dt: Duration) {
        if let ActorPhase::Animating { remaining } = self.phase {
            let remaining = remaining.saturating_sub(dt);
            self.phase = if remaining.is_zero() {
                ActorPhase::Ready
            } else {
                ActorPhase::Animating { remaining }
            };
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ActorRegistry {
    actors: Vec<Actor>,
    watched: Option<ActorId>,
    next_id: u32,
}

impl ActorRegistry {
    pub(crate) fn clear(&mut self) {
        self.actors.clear();
        self.watched = None;
        self.next_id = 0;
    }

    /// Inserts a new actor. The first player becomes the watched actor.
    pub(crate) fn insert(&mut self, kind: ActorKind, coordinate: Coordinate) -> ActorId {
        let id = ActorId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        if kind == ActorKind::Player && self.watched.is_none() {
            self.watched = Some(id);
        }
        self.actors.push(Actor::new(id, kind, coordinate));
        id
    }

    pub(crate) fn remove(&mut self, id: ActorId) -> Option<Actor> {
        let index = self.actors.iter().position(|actor| actor.id == id)?;
        if self.watched == Some(id) {
            self.watched = None;
        }
        Some(self.actors.remove(index))
    }

    pub(crate) fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|actor| actor.id == id)
    }

    pub(crate) fn watched(&self) -> Option<&Actor> {
        self.watched.and_then(|id| self.get(id))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.iter_mut()
    }

    pub(crate) fn count(&self, kind: ActorKind) -> usize {
        self.actors.iter().filter(|actor| actor.kind == kind).count()
    }
}
