//! The population arena.

use epi_core::PersonId;

use crate::person::Person;
use crate::state::DiseaseState;

/// All people in the simulation, indexed by `PersonId`.
///
/// People are never removed — the dead stay in the arena (and in their final
/// location's occupant set) for inspection.  Iteration order is id order,
/// which is the fixed processing order the tick loop relies on for
/// determinism.
#[derive(Default)]
pub struct Population {
    people: Vec<Person>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a person and return their id (sequential from 0).
    ///
    /// `initial_states` must hold exactly one initial state per active
    /// disease, typically produced by
    /// [`Disease::initial_state`][crate::Disease::initial_state] per roster
    /// entry.  Home/workplace/schedules/social edges are filled in afterwards
    /// by the population-construction collaborator.
    pub fn add(
        &mut self,
        home:           Option<epi_core::LocationId>,
        age:            u32,
        initial_states: Vec<DiseaseState>,
    ) -> PersonId {
        let id = PersonId(self.people.len() as u32);
        self.people.push(Person::new(id, home, age, initial_states));
        id
    }

    #[inline]
    pub fn get(&self, id: PersonId) -> &Person {
        &self.people[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: PersonId) -> &mut Person {
        &mut self.people[id.index()]
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Person> {
        self.people.iter_mut()
    }

    /// All ids in ascending (processing) order.
    pub fn ids(&self) -> impl Iterator<Item = PersonId> + '_ {
        (0..self.people.len() as u32).map(PersonId)
    }

    /// Disjoint mutable references to two different people.
    ///
    /// The interaction code constantly needs "me mutable, my partner
    /// mutable" — this is the safe split-borrow for it.
    ///
    /// # Panics
    /// Panics if `a == b`; interacting with oneself is an invariant
    /// violation upstream.
    pub fn pair_mut(&mut self, a: PersonId, b: PersonId) -> (&mut Person, &mut Person) {
        assert_ne!(a, b, "pair_mut requires two distinct people");
        let (lo, hi) = (a.index().min(b.index()), a.index().max(b.index()));
        let (left, right) = self.people.split_at_mut(hi);
        let (first, second) = (&mut left[lo], &mut right[0]);
        if a < b {
            (first, second)
        } else {
            (second, first)
        }
    }
}
