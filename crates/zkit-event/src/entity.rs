//! Entity handles with generational indices, and the roster that owns group
//! members.
//!
//! A member keeps its slot while it belongs to the group. Removing it bumps
//! the slot's generation, so any handle still pointing at the old member is
//! detected as stale instead of reaching whoever reuses the slot.

use std::fmt;

/// Generation counter to detect stale entity handles.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Generation(u32);

impl Generation {
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Debug for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen{}", self.0)
    }
}

/// Handle to a member of an event group.
///
/// Handles are cheap to copy and never keep the member alive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: Generation,
}

impl Entity {
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    #[must_use]
    pub const fn generation(self) -> Generation {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation.0)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation.0)
    }
}

struct Slot<L> {
    generation: Generation,
    member: Option<L>,
}

/// Slot arena owning the members of a group.
///
/// Iteration order is slot order, which is stable for a fixed membership.
pub struct Roster<L> {
    slots: Vec<Slot<L>>,
    free_list: Vec<u32>,
    len: usize,
}

impl<L> Default for Roster<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> Roster<L> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Take ownership of a member and hand out its handle.
    pub fn insert(&mut self, member: L) -> Entity {
        self.len += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.member = Some(member);
            Entity {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            let generation = Generation::default();
            self.slots.push(Slot {
                generation,
                member: Some(member),
            });
            Entity { index, generation }
        }
    }

    /// Remove a member, invalidating every handle to it.
    ///
    /// Returns `None` if the handle is stale.
    pub fn remove(&mut self, entity: Entity) -> Option<L> {
        let slot = self.slots.get_mut(entity.index as usize)?;
        if slot.generation != entity.generation {
            return None;
        }

        let member = slot.member.take()?;
        slot.generation = slot.generation.next();
        self.free_list.push(entity.index);
        self.len -= 1;
        Some(member)
    }

    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&L> {
        let slot = self.slots.get(entity.index as usize)?;
        if slot.generation != entity.generation {
            return None;
        }
        slot.member.as_ref()
    }

    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut L> {
        let slot = self.slots.get_mut(entity.index as usize)?;
        if slot.generation != entity.generation {
            return None;
        }
        slot.member.as_mut()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over members with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &L)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.member.as_ref().map(|member| {
                (
                    Entity {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    member,
                )
            })
        })
    }
}

impl<L> fmt::Debug for Roster<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Roster")
            .field("len", &self.len)
            .field("slots", &self.slots.len())
            .finish()
    }
}
