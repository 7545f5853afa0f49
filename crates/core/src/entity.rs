//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Entities are equal when their identifiers are equal, whatever their other
/// attributes look like. Use [`impl_identity_eq!`](crate::impl_identity_eq) to
/// derive `PartialEq`/`Eq`/`Hash` from [`Entity::id`].
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Returns true when both values denote the same entity.
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

/// Implements `PartialEq`, `Eq` and `Hash` for an [`Entity`] by its id.
#[macro_export]
macro_rules! impl_identity_eq {
    ($t:ty) => {
        impl PartialEq for $t {
            fn eq(&self, other: &Self) -> bool {
                $crate::Entity::same_identity(self, other)
            }
        }

        impl Eq for $t {}

        impl core::hash::Hash for $t {
            fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
                core::hash::Hash::hash($crate::Entity::id(self), state);
            }
        }
    };
}
