/// A key-value pair stored in an ordered collection.
///
/// Ordering between entries is decided by the collection's comparator, so entries themselves
/// carry no ordering obligations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry<T, U> {
    pub key: T,
    pub value: U,
}
