//! Stored identity records.

/// A persisted record keyed by a typed id and unique by email.
///
/// Both tenants and users carry a globally unique email; stores enforce it.
pub trait Entity {
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> Self::Id;

    /// The value of the record's unique email constraint.
    fn email(&self) -> &str;
}
