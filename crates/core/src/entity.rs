//! Entity trait: values whose identity outlives their contents.

/// Anything addressed by its id rather than by its fields.
///
/// Two entries with the same amount and category are still different entries.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
