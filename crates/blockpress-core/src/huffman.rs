//! Huffman coding built from symbol statistics of one image.
//!
//! Encoding side: count symbols into [`Frequencies`], build a
//! [`HuffmanTree`] with the greedy two-lowest merge and read the codes out as
//! a [`HuffmanTable`]. Decoding side: a [`PrefixDecoder`] trie is rebuilt from
//! the table stored in the container and walked one bit at a time.
//!
//! Both the tree and the trie are arenas of nodes addressed by index.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::bits::BitString;
use crate::error::{CodecError, Result};

/// Multiset of symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frequencies<S> {
    counts: BTreeMap<S, u64>,
}

impl<S: Copy + Ord> Default for Frequencies<S> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }
}

impl<S: Copy + Ord> Frequencies<S> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&mut self, symbol: S) {
        *self.counts.entry(symbol).or_insert(0) += 1;
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, symbol: &S) -> u64 {
        self.counts.get(symbol).copied().unwrap_or(0)
    }

    /// Symbols with their counts, in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (S, u64)> + '_ {
        self.counts.iter().map(|(&s, &n)| (s, n))
    }
}

impl<S: Copy + Ord> Extend<S> for Frequencies<S> {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for symbol in iter {
            self.add(symbol);
        }
    }
}

impl<S: Copy + Ord> FromIterator<S> for Frequencies<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut frequencies = Self::new();
        frequencies.extend(iter);
        frequencies
    }
}

#[derive(Debug, Clone)]
enum Node<S> {
    Leaf(S),
    Internal { left: usize, right: usize },
}

/// Minimum-redundancy code tree.
#[derive(Debug, Clone)]
pub struct HuffmanTree<S> {
    nodes: Vec<Node<S>>,
    root: usize,
}

impl<S: Copy + Ord> HuffmanTree<S> {
    /// Builds the tree, `None` for an empty alphabet.
    ///
    /// Nodes are merged lowest weight first. Equal weights are taken in node
    /// creation order (leaves in symbol order, then internal nodes), so equal
    /// inputs always give the same tree.
    pub fn build(frequencies: &Frequencies<S>) -> Option<Self> {
        let mut nodes = Vec::with_capacity(frequencies.len() * 2);
        let mut heap = BinaryHeap::with_capacity(frequencies.len());

        for (symbol, count) in frequencies.iter() {
            heap.push(Reverse((count, nodes.len())));
            nodes.push(Node::Leaf(symbol));
        }

        loop {
            let Reverse((w1, left)) = heap.pop()?;
            let Some(Reverse((w2, right))) = heap.pop() else {
                return Some(Self { nodes, root: left });
            };
            heap.push(Reverse((w1 + w2, nodes.len())));
            nodes.push(Node::Internal { left, right });
        }
    }

    /// Code of every leaf: its path from the root, `0` left and `1` right.
    ///
    /// A tree made of a single leaf gets the one bit code `0`.
    pub fn value_to_bitstring_table(&self) -> Result<HuffmanTable<S>> {
        let mut table = HuffmanTable::new();

        if let Node::Leaf(symbol) = self.nodes[self.root] {
            table.insert(symbol, BitString::EMPTY.with(false)?);
            return Ok(table);
        }

        let mut stack = vec![(self.root, BitString::EMPTY)];
        while let Some((id, prefix)) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf(symbol) => table.insert(symbol, prefix),
                Node::Internal { left, right } => {
                    stack.push((right, prefix.with(true)?));
                    stack.push((left, prefix.with(false)?));
                }
            }
        }

        Ok(table)
    }
}

/// Symbol to code mapping of one symbol class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTable<S> {
    codes: BTreeMap<S, BitString>,
}

impl<S: Copy + Ord> Default for HuffmanTable<S> {
    fn default() -> Self {
        Self {
            codes: BTreeMap::new(),
        }
    }
}

impl<S: Copy + Ord> HuffmanTable<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table for a set of counted symbols, empty if there are none.
    pub fn from_frequencies(frequencies: &Frequencies<S>) -> Result<Self> {
        match HuffmanTree::build(frequencies) {
            Some(tree) => tree.value_to_bitstring_table(),
            None => Ok(Self::new()),
        }
    }

    pub fn insert(&mut self, symbol: S, code: BitString) {
        self.codes.insert(symbol, code);
    }

    #[inline]
    pub fn get(&self, symbol: &S) -> Option<BitString> {
        self.codes.get(symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (S, BitString)> + '_ {
        self.codes.iter().map(|(&s, &c)| (s, c))
    }
}

#[derive(Debug, Clone)]
enum TrieNode<S> {
    Branch([Option<usize>; 2]),
    Leaf(S),
}

/// Bit-by-bit decoder for a prefix-free code.
#[derive(Debug, Clone)]
pub struct PrefixDecoder<S> {
    nodes: Vec<TrieNode<S>>,
}

impl<S: Copy + Ord> Default for PrefixDecoder<S> {
    fn default() -> Self {
        Self {
            nodes: vec![TrieNode::Branch([None, None])],
        }
    }
}

impl<S: Copy + Ord> PrefixDecoder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: &HuffmanTable<S>) -> Result<Self> {
        let mut decoder = Self::new();
        for (symbol, code) in table.iter() {
            decoder.insert(code, symbol)?;
        }
        Ok(decoder)
    }

    /// Adds a code.
    ///
    /// Fails with [`CodecError::AmbiguousCode`] if the code collides with, is
    /// a prefix of, or is prefixed by a code already present.
    pub fn insert(&mut self, code: BitString, symbol: S) -> Result<()> {
        if code.is_empty() {
            return Err(CodecError::CorruptTable {
                reason: "empty huffman code".to_string(),
            });
        }

        let mut node = 0;
        for (i, bit) in code.iter().enumerate() {
            let last = i + 1 == code.len() as usize;
            let children = match &self.nodes[node] {
                TrieNode::Branch(children) => *children,
                TrieNode::Leaf(_) => return Err(CodecError::AmbiguousCode),
            };

            node = match children[bit as usize] {
                Some(_) if last => return Err(CodecError::AmbiguousCode),
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(if last {
                        TrieNode::Leaf(symbol)
                    } else {
                        TrieNode::Branch([None, None])
                    });
                    if let TrieNode::Branch(children) = &mut self.nodes[node] {
                        children[bit as usize] = Some(child);
                    }
                    child
                }
            };
        }

        Ok(())
    }

    /// Pulls bits until they spell a complete code.
    ///
    /// Errors from `next_bit` (e.g. end of stream) are passed through, a bit
    /// sequence that leaves the trie is [`CodecError::InvalidHuffmanCode`].
    pub fn decode_with<F>(&self, mut next_bit: F) -> Result<S>
    where
        F: FnMut() -> Result<bool>,
    {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                TrieNode::Leaf(symbol) => return Ok(*symbol),
                TrieNode::Branch(children) => {
                    let bit = next_bit()?;
                    node = children[bit as usize].ok_or(CodecError::InvalidHuffmanCode)?;
                }
            }
        }
    }
}
