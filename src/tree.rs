//! The AVL engine.
//!
//! Every mutating function takes ownership of a subtree and hands back the
//! (possibly different) root of the rebuilt subtree.  Nothing here knows about
//! element counts; [`SortedMap`](crate::SortedMap) does that bookkeeping.
use std::cmp::Ordering::*;
use std::mem::replace;

use crate::compare::Comparator;
use crate::error::InvariantViolation;

pub(crate) type OptNode<K, V> = Option<Box<Node<K, V>>>;

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) val: V,
    height: i8,
    pub(crate) left: OptNode<K, V>,
    pub(crate) right: OptNode<K, V>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, val: V) -> Box<Self> {
        Box::new(Node {
            key,
            val,
            height: 1,
            left: None,
            right: None,
        })
    }

    // Returns the "balance factor" of the node
    fn bal(&self) -> i8 {
        height(&self.right) - height(&self.left)
    }

    fn is_bal(&self) -> bool {
        (-1..=1).contains(&self.bal())
    }

    fn fix_height(&mut self) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
    }

    // Consumes a node whose children have already been detached.
    pub(crate) fn into_entry(self: Box<Self>) -> (K, V) {
        debug_assert!(self.left.is_none() && self.right.is_none());
        let Node { key, val, .. } = *self;
        (key, val)
    }
}

#[cfg(test)]
impl<K: std::fmt::Debug, V: std::fmt::Debug> std::fmt::Debug for Node<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "(ht: {} {{{:?}: {:?}}} ",
            self.height, self.key, self.val
        ))?;

        match &self.left {
            None => f.write_str(".")?,
            Some(lf) => lf.fmt(f)?,
        }

        f.write_str(" ")?;

        match &self.right {
            None => f.write_str(".")?,
            Some(rt) => rt.fmt(f)?,
        }

        f.write_str(")")
    }
}

pub(crate) fn height<K, V>(opt_node: &OptNode<K, V>) -> i8 {
    opt_node.as_ref().map_or(0, |n| n.height)
}

// Splits a node from its children, leaving it as a height-1 leaf.
#[allow(clippy::type_complexity)]
fn detach<K, V>(
    mut n: Box<Node<K, V>>,
) -> (OptNode<K, V>, Box<Node<K, V>>, OptNode<K, V>) {
    let left = n.left.take();
    let right = n.right.take();
    n.height = 1;
    (left, n, right)
}

fn rotate_left<K, V>(mut a: Box<Node<K, V>>) -> Box<Node<K, V>> {
    //    a(x, b(y, z))   =>   b(a(x, y), z)
    let Some(mut b) = a.right.take() else {
        return a;
    };

    a.right = b.left.take();
    a.fix_height();

    b.left = Some(a);
    b.fix_height();
    b
}

fn rotate_right<K, V>(mut a: Box<Node<K, V>>) -> Box<Node<K, V>> {
    //    a(b(x, y), z)   =>   b(x, a(y, z))
    let Some(mut b) = a.left.take() else {
        return a;
    };

    a.left = b.right.take();
    a.fix_height();

    b.right = Some(a);
    b.fix_height();
    b
}

// Refreshes the height of n and repairs a balance factor of +/-2 with a
// single or double rotation.
fn balance<K, V>(mut n: Box<Node<K, V>>) -> Box<Node<K, V>> {
    n.fix_height();

    let n = match n.bal() {
        2 => {
            if n.right.as_ref().is_some_and(|rt| rt.bal() < 0) {
                n.right = n.right.take().map(rotate_right);
            }
            rotate_left(n)
        }

        -2 => {
            if n.left.as_ref().is_some_and(|lf| lf.bal() > 0) {
                n.left = n.left.take().map(rotate_left);
            }
            rotate_right(n)
        }

        _ => n,
    };

    debug_assert!(n.is_bal(), "balance left factor {}", n.bal());
    n
}

// Hangs `new` (a detached leaf) in the tree at root.  If the tree already has
// the key, the existing node keeps its place and takes new's value.
fn attach<K, V, C>(
    root: OptNode<K, V>,
    new: Box<Node<K, V>>,
    cmp: &C,
) -> (Box<Node<K, V>>, Option<V>)
where
    C: Comparator<K>,
{
    let Some(mut n) = root else {
        return (new, None); // *** EARLY RETURN ***
    };

    match cmp.compare(&new.key, &n.key) {
        Less => {
            let (lf, old_v) = attach(n.left.take(), new, cmp);
            n.left = Some(lf);
            (balance(n), old_v)
        }

        Greater => {
            let (rt, old_v) = attach(n.right.take(), new, cmp);
            n.right = Some(rt);
            (balance(n), old_v)
        }

        Equal => {
            let (_, val) = new.into_entry();
            let old_v = replace(&mut n.val, val);
            (n, Some(old_v))
        }
    }
}

/// Inserts (key, val) below root and returns the new root along with the
/// value that was replaced, if the key was already present.
pub(crate) fn insert<K, V, C>(
    root: OptNode<K, V>,
    key: K,
    val: V,
    cmp: &C,
) -> (Box<Node<K, V>>, Option<V>)
where
    C: Comparator<K>,
{
    attach(root, Node::leaf(key, val), cmp)
}

pub(crate) fn find<'a, K, V, C>(
    mut curr: &'a OptNode<K, V>,
    key: &K,
    cmp: &C,
) -> Option<&'a Node<K, V>>
where
    C: Comparator<K>,
{
    while let Some(n) = curr {
        match cmp.compare(key, &n.key) {
            Less => curr = &n.left,
            Equal => return Some(&**n),
            Greater => curr = &n.right,
        }
    }

    None
}

pub(crate) fn find_mut<'a, K, V, C>(
    mut curr: &'a mut OptNode<K, V>,
    key: &K,
    cmp: &C,
) -> Option<&'a mut V>
where
    C: Comparator<K>,
{
    while let Some(n) = curr {
        match cmp.compare(key, &n.key) {
            Less => curr = &mut n.left,
            Equal => return Some(&mut n.val),
            Greater => curr = &mut n.right,
        }
    }

    None
}

pub(crate) fn find_min<K, V>(mut n: &Node<K, V>) -> &Node<K, V> {
    while let Some(lf) = n.left.as_ref() {
        n = lf;
    }
    n
}

pub(crate) fn find_max<K, V>(mut n: &Node<K, V>) -> &Node<K, V> {
    while let Some(rt) = n.right.as_ref() {
        n = rt;
    }
    n
}

/// Detaches the leftmost node of the tree at n.  Returns the remaining tree
/// and the detached node (as a leaf).
pub(crate) fn remove_min<K, V>(
    mut n: Box<Node<K, V>>,
) -> (OptNode<K, V>, Box<Node<K, V>>) {
    match n.left.take() {
        Some(lf) => {
            let (rest, min) = remove_min(lf);
            n.left = rest;
            (Some(balance(n)), min)
        }

        None => {
            let rest = n.right.take();
            n.height = 1;
            (rest, n)
        }
    }
}

/// Joins two trees into one balanced tree.
///
/// Requires every key in left to be less than every key in right.
pub(crate) fn merge<K, V>(
    left: OptNode<K, V>,
    right: OptNode<K, V>,
) -> OptNode<K, V> {
    let (mut lf, mut rt) = match (left, right) {
        (None, right) => return right,
        (left, None) => return left,
        (Some(lf), Some(rt)) => (lf, rt),
    };

    if lf.height > rt.height {
        // descend the right spine of the taller left tree
        lf.right = merge(lf.right.take(), Some(rt));
        Some(balance(lf))
    } else if lf.height + 1 < rt.height {
        // descend the left spine of the taller right tree
        rt.left = merge(Some(lf), rt.left.take());
        Some(balance(rt))
    } else {
        // heights are within one: the least node of right becomes the root
        let (rest, mut root) = remove_min(rt);
        root.left = Some(lf);
        root.right = rest;
        Some(balance(root))
    }
}

/// Partitions the tree at root into the keys less than `key` and the keys
/// greater than `key`.  The entry matching `key`, if any, belongs to neither
/// half and is returned on its own.
#[allow(clippy::type_complexity)]
pub(crate) fn split<K, V, C>(
    root: OptNode<K, V>,
    key: &K,
    cmp: &C,
) -> (OptNode<K, V>, Option<(K, V)>, OptNode<K, V>)
where
    C: Comparator<K>,
{
    let Some(n) = root else {
        return (None, None, None);
    };

    let (left, n, right) = detach(n);

    match cmp.compare(&n.key, key) {
        Less => {
            let (lt, orig_kv, gt) = split(right, key, cmp);
            let (lt, _) = attach(merge(left, lt), n, cmp);
            (Some(lt), orig_kv, gt)
        }

        Greater => {
            let (lt, orig_kv, gt) = split(left, key, cmp);
            let (gt, _) = attach(merge(gt, right), n, cmp);
            (lt, orig_kv, Some(gt))
        }

        Equal => (left, Some(n.into_entry()), right),
    }
}

/// Removes key from the tree by splitting around it and merging the halves.
/// Returns the new root and the removed entry.
///
/// The tree is rebuilt along the search path even when the key is absent.
pub(crate) fn remove<K, V, C>(
    root: OptNode<K, V>,
    key: &K,
    cmp: &C,
) -> (OptNode<K, V>, Option<(K, V)>)
where
    C: Comparator<K>,
{
    let (lt, orig_kv, gt) = split(root, key, cmp);
    (merge(lt, gt), orig_kv)
}

/// Visits every entry in key order.
pub(crate) fn for_each<'a, K, V, F>(opt_node: &'a OptNode<K, V>, f: &mut F)
where
    F: FnMut((&'a K, &'a V)),
{
    if let Some(n) = opt_node {
        for_each(&n.left, f);
        f((&n.key, &n.val));
        for_each(&n.right, f);
    }
}

/// Verifies ordering, balance and cached heights.  Returns the node count.
pub(crate) fn check<K, V, C>(
    root: &OptNode<K, V>,
    cmp: &C,
) -> Result<usize, InvariantViolation>
where
    C: Comparator<K>,
{
    let mut prev = None;
    let mut position = 0;
    chk(root, cmp, &mut prev, &mut position)?;
    Ok(position)
}

fn chk<'a, K, V, C>(
    opt_node: &'a OptNode<K, V>,
    cmp: &C,
    prev: &mut Option<&'a K>,
    position: &mut usize,
) -> Result<(), InvariantViolation>
where
    C: Comparator<K>,
{
    let Some(n) = opt_node else {
        return Ok(());
    };

    chk(&n.left, cmp, prev, position)?;

    if let Some(p) = *prev {
        if cmp.compare(p, &n.key) != Less {
            return Err(InvariantViolation::Unordered {
                position: *position,
            });
        }
    }

    let computed = height(&n.left).max(height(&n.right)) + 1;
    if n.height != computed {
        return Err(InvariantViolation::BadHeight {
            position: *position,
            stored: n.height,
            computed,
        });
    }

    if !n.is_bal() {
        return Err(InvariantViolation::Unbalanced {
            position: *position,
            factor: n.bal(),
        });
    }

    *prev = Some(&n.key);
    *position += 1;

    chk(&n.right, cmp, prev, position)
}
