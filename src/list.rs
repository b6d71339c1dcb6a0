//! The homogeneous list node backing.
//!
//! A [`List`] is an ordered sequence of nodes that all share one concrete
//! [`NodeKind`]. An empty list has no kind yet and accepts any first
//! element; from then on the kind is locked and every mutation is
//! validated against it.

use crate::{
    errors::TypeMismatchError,
    Node, NodeKind, VecMap,
};
use bytes::Bytes;
use std::{convert::TryFrom, iter::FromIterator, slice::Iter, vec::IntoIter};

/// An ordered, homogeneous sequence of nodes.
///
/// # Example
///
/// ```
/// use bintag::{List, Node};
///
/// let mut list = List::new();
/// list.push(Node::Int(1)).unwrap();
/// list.push(Node::Int(2)).unwrap();
///
/// // the kind locked on first insertion
/// assert!(list.push(Node::from("three")).is_err());
/// assert_eq!(list.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct List(Vec<Node>);

impl List {
    /// Creates an empty list of no fixed kind.
    pub fn new() -> Self {
        List(Vec::new())
    }

    /// The element kind this list is locked to, `None` while empty.
    pub fn kind(&self) -> Option<NodeKind> {
        self.0.first().map(Node::kind)
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Indicates whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Checks a candidate element against the locked kind.
    pub fn validate(&self, node: &Node) -> Result<(), TypeMismatchError> {
        match self.kind() {
            Some(expected) if node.kind() != expected => Err(TypeMismatchError {
                expected,
                found: node.kind(),
            }),
            _ => Ok(()),
        }
    }

    /// Appends an element.
    pub fn push(&mut self, node: Node) -> Result<(), TypeMismatchError> {
        self.validate(&node)?;
        self.0.push(node);
        Ok(())
    }

    /// Inserts an element at `index`, shifting later elements up.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, like [`Vec::insert`].
    pub fn insert(&mut self, index: usize, node: Node) -> Result<(), TypeMismatchError> {
        self.validate(&node)?;
        self.0.insert(index, node);
        Ok(())
    }

    /// Replaces the element at `index`, returning the old one.
    ///
    /// The replacement is validated against the locked kind; switching a
    /// list to another kind goes through [`clear`](List::clear).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn set(&mut self, index: usize, node: Node) -> Result<Node, TypeMismatchError> {
        self.validate(&node)?;
        Ok(std::mem::replace(&mut self.0[index], node))
    }

    /// Appends every element of `iter`, validating each.
    ///
    /// Elements before the first mismatch stay appended.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<(), TypeMismatchError>
    where
        I: IntoIterator<Item = Node>,
    {
        for node in iter {
            self.push(node)?;
        }
        Ok(())
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<Node> {
        self.0.pop()
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> Node {
        self.0.remove(index)
    }

    /// Drops every element, unlocking the kind.
    pub fn clear(&mut self) {
        self.0.clear()
    }

    /// Borrows the element at `index`.
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.0.get(index)
    }

    /// Mutably borrows the element at `index`.
    ///
    /// Replacing the node wholesale through this reference can break
    /// homogeneity; prefer [`set`](List::set).
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.0.get_mut(index)
    }

    /// Iterates over the elements.
    pub fn iter(&self) -> Iter<Node> {
        self.0.iter()
    }

    /// Borrows the elements as a slice.
    pub fn as_slice(&self) -> &[Node] {
        &self.0
    }

    /// Builds a list from elements known to be homogeneous.
    pub(crate) fn from_vec_unchecked(v: Vec<Node>) -> Self {
        debug_assert!(v.windows(2).all(|w| w[0].kind() == w[1].kind()));
        List(v)
    }
}

macro_rules! typed_push {
    ($name:ident, $typ:ty, $doc:expr) => {
        impl List {
            #[doc = $doc]
            pub fn $name(&mut self, value: $typ) -> Result<(), TypeMismatchError> {
                self.push(Node::from(value))
            }
        }
    };
}

typed_push!(push_bool, bool, "Appends a boolean as a byte node.");
typed_push!(push_byte, i8, "Appends a byte node.");
typed_push!(push_short, i16, "Appends a short node.");
typed_push!(push_int, i32, "Appends an int node.");
typed_push!(push_long, i64, "Appends a long node.");
typed_push!(push_float, f32, "Appends a float node.");
typed_push!(push_double, f64, "Appends a double node.");
typed_push!(push_byte_array, Bytes, "Appends a byte array node.");
typed_push!(push_str, &str, "Appends a string node.");
typed_push!(push_list, List, "Appends a list node.");
typed_push!(push_map, VecMap<String, Node>, "Appends a map node.");
typed_push!(push_int_array, Vec<i32>, "Appends an int array node.");
typed_push!(push_long_array, Vec<i64>, "Appends a long array node.");

impl TryFrom<Vec<Node>> for List {
    type Error = TypeMismatchError;

    /// Builds a list from a vector, validating homogeneity.
    fn try_from(v: Vec<Node>) -> Result<Self, TypeMismatchError> {
        if let Some((first, rest)) = v.split_first() {
            let expected = first.kind();
            for node in rest {
                if node.kind() != expected {
                    return Err(TypeMismatchError {
                        expected,
                        found: node.kind(),
                    });
                }
            }
        }
        Ok(List(v))
    }
}

impl From<List> for Vec<Node> {
    fn from(list: List) -> Self {
        list.0
    }
}

impl IntoIterator for List {
    type IntoIter = IntoIter<Node>;
    type Item = Node;

    fn into_iter(self) -> IntoIter<Node> {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a List {
    type IntoIter = Iter<'a, Node>;
    type Item = &'a Node;

    fn into_iter(self) -> Iter<'a, Node> {
        self.0.iter()
    }
}

/// Collecting panics on a heterogeneous source; use
/// [`List::try_extend`] when the kinds are not statically known.
impl FromIterator<Node> for List {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> List {
        let mut out = List::new();
        for node in iter {
            out.push(node).expect("heterogeneous elements in collected list");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_accepts_anything_then_locks() {
        let mut list = List::new();
        assert_eq!(list.kind(), None);
        list.push(Node::from("a")).unwrap();
        assert_eq!(list.kind(), Some(NodeKind::String));
        list.push_str("b").unwrap();

        let err = list.push(Node::Int(1)).unwrap_err();
        assert_eq!(err.expected, NodeKind::String);
        assert_eq!(err.found, NodeKind::Int);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn clear_unlocks() {
        let mut list = List::new();
        list.push_int(1).unwrap();
        list.clear();
        list.push_str("now strings").unwrap();
    }

    #[test]
    fn try_from_validates() {
        assert!(List::try_from(vec![Node::Byte(1), Node::Byte(2)]).is_ok());
        assert!(List::try_from(Vec::new()).is_ok());
        assert!(List::try_from(vec![Node::Byte(1), Node::Short(2)]).is_err());
    }

    #[test]
    fn set_revalidates_every_replacement() {
        let mut list = List::try_from(vec![Node::Int(1), Node::Int(2)]).unwrap();
        assert!(list.set(0, Node::from("s")).is_err());
        let old = list.set(1, Node::Int(20)).unwrap();
        assert_eq!(old, Node::Int(2));
    }

    #[test]
    fn set_cannot_change_a_singleton_kind() {
        let mut list = List::try_from(vec![Node::Int(1)]).unwrap();
        let err = list.set(0, Node::from("s")).unwrap_err();
        assert_eq!(err.expected, NodeKind::Int);
        assert_eq!(err.found, NodeKind::String);
        assert_eq!(list.kind(), Some(NodeKind::Int));

        list.set(0, Node::Int(2)).unwrap();
        assert_eq!(list.get(0), Some(&Node::Int(2)));
    }

    #[test]
    fn try_extend_validates_each() {
        let mut list = List::new();
        let err = list
            .try_extend(vec![Node::Byte(1), Node::Byte(2), Node::Long(3)])
            .unwrap_err();
        assert_eq!(err.found, NodeKind::Long);
        // the valid prefix stayed
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn order_matters_for_equality() {
        let a = List::try_from(vec![Node::Int(1), Node::Int(2)]).unwrap();
        let b = List::try_from(vec![Node::Int(2), Node::Int(1)]).unwrap();
        assert_ne!(a, b);
    }
}
