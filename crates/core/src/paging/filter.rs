use crate::id::InstitutionId;

/// A sparse set of optional field constraints narrowing a listing query.
///
/// Each present field contributes one AND-ed predicate; an absent field
/// contributes nothing (it never turns into a predicate that matches nothing).
/// Two filters are equal iff all recognized fields match, so implementors
/// derive `PartialEq`.
pub trait Filter: Clone + PartialEq + core::fmt::Debug + Send + Sync {
    /// Institution the listing is confined to, for institution-scoped resources.
    fn institution_id(&self) -> Option<InstitutionId> {
        None
    }
}

type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Storage-neutral conjunction of predicates translated from a [`Filter`].
///
/// An empty specification is satisfied by every item.
pub struct Specification<T> {
    predicates: Vec<Predicate<T>>,
}

impl<T> Default for Specification<T> {
    fn default() -> Self {
        Self::all()
    }
}

impl<T> core::fmt::Debug for Specification<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Specification")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

impl<T> Specification<T> {
    /// Matches everything.
    pub fn all() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    pub fn and(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Adds `predicate` bound to `value` only when the constraint is present.
    pub fn and_if_present<V>(
        self,
        value: Option<V>,
        predicate: impl Fn(&T, &V) -> bool + Send + Sync + 'static,
    ) -> Self
    where
        V: Send + Sync + 'static,
    {
        match value {
            Some(v) => self.and(move |item| predicate(item, &v)),
            None => self,
        }
    }

    pub fn is_satisfied_by(&self, item: &T) -> bool {
        self.predicates.iter().all(|p| p(item))
    }

    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }
}
