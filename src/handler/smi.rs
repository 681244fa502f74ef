//! SMI tree: serve a whole subtree of values from one registration.
//!
//! A [`SmiNode`] is either a leaf holding a [`Value`] or a subtree whose
//! children sit at consecutive arcs starting from 1. [`tree_handler`] wraps
//! a closure building such a tree and answers each GET under the
//! registration root by walking the part of the OID below the root.
//!
//! ```rust
//! use snmp_subagent::handler::{SmiNode, tree_handler};
//!
//! // root.1.0 = 21, root.2.1.0 = "rack-12", root.2.2.0 = 1
//! let handler = tree_handler(|_ctx| {
//!     Ok(SmiNode::subtree([
//!         SmiNode::leaf(21),
//!         SmiNode::subtree([SmiNode::leaf("rack-12"), SmiNode::leaf(true)]),
//!     ]))
//! });
//! # let _ = handler;
//! ```

use crate::error::ErrorStatus;
use crate::value::Value;

use super::{HandlerError, RequestChain, RequestContext, ScalarHandler};

/// A node of an SMI tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SmiNode {
    /// A value-bearing leaf.
    Leaf(Value),
    /// Children at arcs 1, 2, 3, ...
    Subtree(Vec<SmiNode>),
}

impl SmiNode {
    /// A leaf holding `value`.
    pub fn leaf(value: impl Into<Value>) -> Self {
        Self::Leaf(value.into())
    }

    /// A subtree with `children` at arcs 1, 2, 3, ...
    pub fn subtree(children: impl IntoIterator<Item = SmiNode>) -> Self {
        Self::Subtree(children.into_iter().collect())
    }

    /// Append a child at the next arc.
    ///
    /// Returns `false`, leaving the node unchanged, if this is a leaf.
    pub fn push(&mut self, child: SmiNode) -> bool {
        match self {
            Self::Subtree(children) => {
                children.push(child);
                true
            }
            Self::Leaf(_) => false,
        }
    }

    /// The leaf value, if this is a leaf.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Leaf(value) => Some(value),
            Self::Subtree(_) => None,
        }
    }

    /// The children, if this is a subtree.
    pub fn children(&self) -> Option<&[SmiNode]> {
        match self {
            Self::Leaf(_) => None,
            Self::Subtree(children) => Some(children),
        }
    }

    /// Look up a node by an OID relative to this one.
    ///
    /// Arcs are 1-based: `[1, 3]` is the third child of the first child.
    /// Reaching a leaf ends the walk, so trailing arcs such as the `.0`
    /// instance suffix of a scalar resolve to that leaf. An empty path, an
    /// arc of 0 or an arc past the last child finds nothing.
    pub fn get(&self, relative: &[u32]) -> Option<&SmiNode> {
        let (&first, rest) = relative.split_first()?;
        let children = match self {
            Self::Leaf(_) => return Some(self),
            Self::Subtree(children) => children,
        };
        let idx = usize::try_from(first).ok()?.checked_sub(1)?;
        let child = children.get(idx)?;
        if rest.is_empty() {
            Some(child)
        } else {
            child.get(rest)
        }
    }

    /// The leaf value at `relative`, see [`get`](Self::get).
    pub fn get_value(&self, relative: &[u32]) -> Option<&Value> {
        self.get(relative).and_then(SmiNode::value)
    }
}

impl From<Value> for SmiNode {
    fn from(value: Value) -> Self {
        Self::Leaf(value)
    }
}

/// A [`ScalarHandler`] serving an [`SmiNode`] tree rooted at the
/// registration OID.
///
/// The tree is rebuilt by the closure on every GET. A path that does not
/// exist answers `noSuchObject`; a path ending on a subtree answers
/// `noSuchInstance`. Both carry `noError`, like any other exception value.
pub struct TreeHandler<F> {
    f: F,
}

impl<F> ScalarHandler for TreeHandler<F>
where
    F: Fn(&RequestContext<'_>) -> Result<SmiNode, HandlerError> + Send + Sync + 'static,
{
    fn resolve(&self, ctx: &RequestContext<'_>, requests: &mut RequestChain) -> ErrorStatus {
        let tree = match (self.f)(ctx) {
            Ok(tree) => tree,
            Err(error) => {
                tracing::warn!(
                    handler = ctx.handler_name,
                    oid = %ctx.root_oid,
                    error = %error,
                    "SMI tree handler failed"
                );
                return ErrorStatus::GenErr;
            }
        };

        for request in requests.iter_mut() {
            let value = match request
                .oid()
                .strip_prefix(ctx.root_oid)
                .and_then(|relative| tree.get(relative))
            {
                Some(SmiNode::Leaf(value)) => value.clone(),
                Some(SmiNode::Subtree(_)) => Value::NoSuchInstance,
                None => Value::NoSuchObject,
            };
            tracing::trace!(oid = %request.oid(), value = %value, "SMI tree lookup");
            request.set_value(value);
        }
        ErrorStatus::NoError
    }
}

impl<F> std::fmt::Debug for TreeHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeHandler").finish_non_exhaustive()
    }
}

/// Handler answering GETs below its root from the tree the closure builds.
pub fn tree_handler<F>(f: F) -> TreeHandler<F>
where
    F: Fn(&RequestContext<'_>) -> Result<SmiNode, HandlerError> + Send + Sync + 'static,
{
    TreeHandler { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::oid::Oid;

    fn sample() -> SmiNode {
        SmiNode::subtree([
            SmiNode::leaf(21),
            SmiNode::subtree([SmiNode::leaf("rack-12"), SmiNode::leaf(true)]),
            SmiNode::subtree([]),
        ])
    }

    #[test]
    fn test_get_is_one_based() {
        let tree = sample();
        assert_eq!(tree.get_value(&[1]), Some(&Value::Integer(21)));
        assert_eq!(tree.get_value(&[2, 1]), Some(&Value::from("rack-12")));
        assert_eq!(tree.get_value(&[2, 2]), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_get_trailing_arcs_resolve_to_leaf() {
        let tree = sample();
        assert_eq!(tree.get_value(&[1, 0]), Some(&Value::Integer(21)));
        assert_eq!(tree.get_value(&[2, 1, 0, 7]), Some(&Value::from("rack-12")));
    }

    #[test]
    fn test_get_misses() {
        let tree = sample();
        assert!(tree.get(&[]).is_none());
        assert!(tree.get(&[0]).is_none());
        assert!(tree.get(&[4]).is_none());
        assert!(tree.get(&[2, 3]).is_none());
        assert!(tree.get(&[3, 1]).is_none());
        assert!(tree.get(&[u32::MAX]).is_none());
    }

    #[test]
    fn test_get_subtree_node() {
        let tree = sample();
        let node = tree.get(&[2]).unwrap();
        assert_eq!(node.children().map(<[SmiNode]>::len), Some(2));
        assert!(node.value().is_none());
    }

    #[test]
    fn test_push() {
        let mut tree = SmiNode::subtree([]);
        assert!(tree.push(SmiNode::leaf(5)));
        assert!(tree.push(Value::Integer(7).into()));
        assert_eq!(tree.get_value(&[2]), Some(&Value::Integer(7)));

        let mut leaf = SmiNode::leaf(1);
        assert!(!leaf.push(SmiNode::leaf(2)));
        assert_eq!(leaf, SmiNode::leaf(1));
    }

    fn resolve(handler: &dyn ScalarHandler, oid: Oid) -> (ErrorStatus, Option<Value>) {
        let root = oid!(1, 3, 6, 1, 4, 1, 50000, 10);
        let ctx = RequestContext {
            handler_name: "tree",
            root_oid: &root,
        };
        let mut chain = RequestChain::single(oid);
        let status = handler.resolve(&ctx, &mut chain);
        (status, chain.first().and_then(|r| r.value().cloned()))
    }

    #[test]
    fn test_tree_handler_answers_leaves_and_exceptions() {
        let handler = tree_handler(|_| Ok(sample()));

        assert_eq!(
            resolve(&handler, oid!(1, 3, 6, 1, 4, 1, 50000, 10, 2, 1, 0)),
            (ErrorStatus::NoError, Some(Value::from("rack-12")))
        );
        assert_eq!(
            resolve(&handler, oid!(1, 3, 6, 1, 4, 1, 50000, 10, 2)),
            (ErrorStatus::NoError, Some(Value::NoSuchInstance))
        );
        assert_eq!(
            resolve(&handler, oid!(1, 3, 6, 1, 4, 1, 50000, 10, 9, 0)),
            (ErrorStatus::NoError, Some(Value::NoSuchObject))
        );
        assert_eq!(
            resolve(&handler, oid!(1, 3, 6, 1, 4, 1, 50000, 10)),
            (ErrorStatus::NoError, Some(Value::NoSuchObject))
        );
    }

    #[test]
    fn test_tree_handler_error_is_generr() {
        let handler = tree_handler(|_| Err("tree unavailable".into()));
        assert_eq!(
            resolve(&handler, oid!(1, 3, 6, 1, 4, 1, 50000, 10, 1, 0)),
            (ErrorStatus::GenErr, None)
        );
    }
}
