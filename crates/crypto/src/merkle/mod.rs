// Path: crates/crypto/src/merkle/mod.rs
//! Blake2b Merkle trees over ordered value lists, and inclusion paths.
//!
//! The tree is built top-down: a list of `n > 1` values is split at
//! `ceil(n / 2)`, both halves are reduced recursively and the parent is
//! `blake2b(left ‖ right)`. Leaves are `blake2b(value)`. An odd count therefore
//! leaves the larger half on the left; nothing is duplicated.

use crate::algorithms::hash::blake2b;
use bytes::BufMut;
use nimiq_types::codec::{read_array, read_bytes, read_u8, Decode, Encode};
use nimiq_types::error::CodecError;

/// Size of every node hash.
pub const HASH_SIZE: usize = 32;

fn hash_pair(left: &[u8; HASH_SIZE], right: &[u8; HASH_SIZE]) -> [u8; HASH_SIZE] {
    let mut joined = Vec::with_capacity(2 * HASH_SIZE);
    joined.extend_from_slice(left);
    joined.extend_from_slice(right);
    blake2b(joined)
}

/// Root computation over ordered value lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct MerkleTree;

impl MerkleTree {
    /// The Merkle root of `values`, in the given order.
    ///
    /// An empty list hashes to `blake2b(b"")`, a single value to `blake2b(value)`.
    pub fn compute_root<T: AsRef<[u8]>>(values: &[T]) -> [u8; HASH_SIZE] {
        match values {
            [] => blake2b(b""),
            [single] => blake2b(single.as_ref()),
            _ => {
                let (left, right) = values.split_at(values.len().div_ceil(2));
                hash_pair(&Self::compute_root(left), &Self::compute_root(right))
            }
        }
    }
}

/// Free-function form of [`MerkleTree::compute_root`].
pub fn compute_root<T: AsRef<[u8]>>(values: &[T]) -> [u8; HASH_SIZE] {
    MerkleTree::compute_root(values)
}

/// One step of a [`MerklePath`]: the sibling hash and the side it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MerklePathNode {
    /// `true` if the sibling is the left child, i.e. the path runs through the right one.
    pub left: bool,
    /// The sibling subtree's hash.
    pub hash: [u8; HASH_SIZE],
}

/// Sibling hashes from a leaf up to the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct MerklePath {
    nodes: Vec<MerklePathNode>,
}

impl MerklePath {
    /// Wraps an existing node list, ordered leaf to root.
    pub fn new(nodes: Vec<MerklePathNode>) -> Self {
        Self { nodes }
    }

    /// Builds the path of `leaf` within the tree over `values`.
    ///
    /// Returns `None` when `leaf` is not one of the values.
    pub fn build<T: AsRef<[u8]>>(values: &[T], leaf: &[u8]) -> Option<Self> {
        let mut nodes = Vec::new();
        let (_, found) = Self::collect(values, leaf, &mut nodes);
        found.then_some(Self { nodes })
    }

    fn collect<T: AsRef<[u8]>>(
        values: &[T],
        leaf: &[u8],
        nodes: &mut Vec<MerklePathNode>,
    ) -> ([u8; HASH_SIZE], bool) {
        match values {
            [] => (blake2b(b""), false),
            [single] => (blake2b(single.as_ref()), single.as_ref() == leaf),
            _ => {
                let (left, right) = values.split_at(values.len().div_ceil(2));
                let (left_hash, in_left) = Self::collect(left, leaf, nodes);
                let (right_hash, in_right) = if in_left {
                    (MerkleTree::compute_root(right), false)
                } else {
                    Self::collect(right, leaf, nodes)
                };
                if in_left {
                    nodes.push(MerklePathNode {
                        left: false,
                        hash: right_hash,
                    });
                } else if in_right {
                    nodes.push(MerklePathNode {
                        left: true,
                        hash: left_hash,
                    });
                }
                (hash_pair(&left_hash, &right_hash), in_left || in_right)
            }
        }
    }

    /// Recomputes the root from `leaf` along this path.
    pub fn compute_root(&self, leaf: &[u8]) -> [u8; HASH_SIZE] {
        self.nodes.iter().fold(blake2b(leaf), |root, node| {
            if node.left {
                hash_pair(&node.hash, &root)
            } else {
                hash_pair(&root, &node.hash)
            }
        })
    }

    /// The path nodes, leaf to root.
    pub fn nodes(&self) -> &[MerklePathNode] {
        &self.nodes
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` for the path of a single-value tree.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn bitmap_len(count: usize) -> usize {
        count.div_ceil(8)
    }
}

impl Encode for MerklePath {
    /// `count u8 ‖ left bits (MSB first) ‖ hashes`.
    fn encode<B: BufMut>(&self, buf: &mut B) {
        let count = u8::try_from(self.nodes.len()).unwrap_or(u8::MAX);
        buf.put_u8(count);
        let nodes = self.nodes.iter().take(usize::from(count));
        let mut bitmap = vec![0u8; Self::bitmap_len(usize::from(count))];
        for (i, node) in nodes.clone().enumerate() {
            if let (true, Some(byte)) = (node.left, bitmap.get_mut(i / 8)) {
                *byte |= 0x80 >> (i % 8);
            }
        }
        buf.put_slice(&bitmap);
        for node in nodes {
            buf.put_slice(&node.hash);
        }
    }

    fn encoded_len(&self) -> usize {
        let count = self.nodes.len().min(usize::from(u8::MAX));
        1 + Self::bitmap_len(count) + count * HASH_SIZE
    }
}

impl Decode for MerklePath {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        let count = usize::from(read_u8(reader)?);
        let bitmap = read_bytes(reader, Self::bitmap_len(count))?;
        let padding_bits = (8 - count % 8) % 8;
        if padding_bits > 0 {
            let unused_mask = (1u8 << padding_bits) - 1;
            if bitmap.last().is_some_and(|b| b & unused_mask != 0) {
                return Err(CodecError::Invalid(
                    "merkle path bitmap has unused bits set".to_string(),
                ));
            }
        }
        let mut nodes = Vec::with_capacity(count);
        for i in 0..count {
            let left = bitmap
                .get(i / 8)
                .is_some_and(|byte| byte & (0x80 >> (i % 8)) != 0);
            nodes.push(MerklePathNode {
                left,
                hash: read_array(reader)?,
            });
        }
        Ok(Self { nodes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimiq_types::codec::{from_bytes_canonical, to_bytes_canonical};

    fn values(n: u8) -> Vec<Vec<u8>> {
        (0..n).map(|i| vec![i; usize::from(i) + 1]).collect()
    }

    #[test]
    fn empty_and_single_roots() {
        let empty: [&[u8]; 0] = [];
        assert_eq!(MerkleTree::compute_root(&empty), blake2b(b""));
        assert_eq!(compute_root(&[b"one".as_slice()]), blake2b(b"one"));
    }

    #[test]
    fn two_values_hash_left_then_right() {
        let root = MerkleTree::compute_root(&[b"a".as_slice(), b"b".as_slice()]);
        assert_eq!(root, hash_pair(&blake2b(b"a"), &blake2b(b"b")));
        assert_ne!(
            root,
            MerkleTree::compute_root(&[b"b".as_slice(), b"a".as_slice()])
        );
    }

    #[test]
    fn odd_count_splits_larger_half_left() {
        let v = [b"a".as_slice(), b"b".as_slice(), b"c".as_slice()];
        let expected = hash_pair(
            &hash_pair(&blake2b(b"a"), &blake2b(b"b")),
            &blake2b(b"c"),
        );
        assert_eq!(MerkleTree::compute_root(&v), expected);
    }

    #[test]
    fn every_leaf_path_recomputes_root() {
        for n in 1..=9u8 {
            let values = values(n);
            let root = MerkleTree::compute_root(&values);
            for value in &values {
                let path = MerklePath::build(&values, value).unwrap();
                assert_eq!(path.compute_root(value), root, "n = {n}");
                assert!(path.len() <= 4);
            }
        }
    }

    #[test]
    fn path_for_missing_leaf_is_none() {
        assert!(MerklePath::build(&values(4), b"missing").is_none());
        let empty: [&[u8]; 0] = [];
        assert!(MerklePath::build(&empty, b"").is_none());
    }

    #[test]
    fn path_of_wrong_leaf_gives_other_root() {
        let values = values(5);
        let path = MerklePath::build(&values, &values[1]).unwrap();
        assert_ne!(
            path.compute_root(&values[2]),
            MerkleTree::compute_root(&values)
        );
    }

    #[test]
    fn path_serialization_layout() {
        let values = values(5);
        // values[3] is a left child, and its pair is the root's right half.
        let path = MerklePath::build(&values, &values[3]).unwrap();
        let bytes = to_bytes_canonical(&path);
        assert_eq!(bytes.len(), path.encoded_len());
        assert_eq!(bytes[0], 2);
        assert_eq!(bytes[1], 0b0100_0000);
        assert_eq!(from_bytes_canonical::<MerklePath>(&bytes).unwrap(), path);
    }

    #[test]
    fn stray_bitmap_bits_are_rejected() {
        let values = values(2);
        let path = MerklePath::build(&values, &values[0]).unwrap();
        let mut bytes = to_bytes_canonical(&path);
        bytes[1] |= 0x01;
        assert!(matches!(
            from_bytes_canonical::<MerklePath>(&bytes),
            Err(CodecError::Invalid(_))
        ));
    }
}
