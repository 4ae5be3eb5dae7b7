//! Live subscription set of a group.

use hashbrown::HashSet;
use smallvec::SmallVec;

use crate::entity::Entity;
use crate::event::Event;
use crate::subscription::{Binding, HandlerId, Subscription};

/// Indices of subscriptions matching one event, in registration order.
pub type Matches = SmallVec<[usize; 8]>;

/// Owns the live subscriptions and answers match queries.
pub struct SubscriptionRegistry<L> {
    subscriptions: Vec<Subscription<L>>,
    identities: HashSet<(Entity, HandlerId)>,
}

impl<L> Default for SubscriptionRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> SubscriptionRegistry<L> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
            identities: HashSet::new(),
        }
    }

    /// Attach `bindings` to `owner`, skipping handlers already bound for it.
    ///
    /// Returns how many subscriptions were added.
    pub fn bind(&mut self, owner: Entity, bindings: impl IntoIterator<Item = Binding<L>>) -> usize {
        let mut added = 0;
        for binding in bindings {
            if !self.identities.insert((owner, binding.id)) {
                tracing::trace!(%owner, handler = %binding.id, "handler already bound");
                continue;
            }
            self.subscriptions.push(Subscription::new(owner, binding));
            added += 1;
        }
        added
    }

    /// Drop every subscription whose owner fails `is_member`.
    ///
    /// The surviving list is built separately and swapped in, so the live
    /// list is never edited while it is being walked. Returns how many
    /// subscriptions were dropped.
    pub fn unbind_stale(&mut self, mut is_member: impl FnMut(Entity) -> bool) -> usize {
        let before = self.subscriptions.len();
        if self.subscriptions.iter().all(|sub| is_member(sub.owner())) {
            return 0;
        }

        let live: Vec<_> = std::mem::take(&mut self.subscriptions)
            .into_iter()
            .filter(|sub| is_member(sub.owner()))
            .collect();
        self.identities = live.iter().map(Subscription::identity).collect();
        self.subscriptions = live;

        before - self.subscriptions.len()
    }

    /// Find the subscriptions `event` routes to.
    #[must_use]
    pub fn matching(&self, event: &Event) -> Matches {
        self.subscriptions
            .iter()
            .enumerate()
            .filter(|(_, sub)| sub.matches(event))
            .map(|(index, _)| index)
            .collect()
    }

    /// Get a subscription by its registration index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Subscription<L>> {
        self.subscriptions.get(index)
    }

    /// Number of subscriptions held by `owner`.
    #[must_use]
    pub fn subscriptions_of(&self, owner: Entity) -> usize {
        self.subscriptions
            .iter()
            .filter(|sub| sub.owner() == owner)
            .count()
    }

    /// Iterate over subscriptions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Subscription<L>> + '_ {
        self.subscriptions.iter()
    }

    /// Get the number of subscriptions held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

impl<L> core::fmt::Debug for SubscriptionRegistry<L> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SubscriptionRegistry")
            .field("subscriptions", &self.subscriptions)
            .finish()
    }
}
