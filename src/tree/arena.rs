//! Owned, immutable parse-tree snapshots.
//!
//! Nodes live in a flat arena and refer to their children by index, so a
//! tree can be handed around without borrowing from whatever produced it.
//! Node 0 is always the root.

/// Index of a node inside its [`ParseTree`].
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
struct TreeNode {
    label: String,
    children: Vec<NodeId>,
}

/// A constituency parse tree.
///
/// Internal nodes carry syntactic categories (`S`, `NP`, `NN`, ...). A node
/// without children is a leaf and its label is the token itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    nodes: Vec<TreeNode>,
}

impl ParseTree {
    /// A tree consisting of a single (leaf) root node.
    pub fn leaf(label: impl Into<String>) -> Self {
        TreeBuilder::new(label).build()
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn label(&self, node: NodeId) -> &str {
        &self.nodes[node].label
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node].children
    }

    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.nodes[node].children.is_empty()
    }

    /// Total number of nodes, leaves included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Leaves paired with their parent's label, in pre-order.
    ///
    /// The root is never reported, even when it is itself a leaf, because it
    /// has no parent label.
    pub fn tagged_leaves(&self) -> TaggedLeaves<'_> {
        TaggedLeaves {
            tree: self,
            stack: vec![(self.root(), 0)],
        }
    }

    /// The words of the sentence, in order.
    pub fn words(&self) -> Vec<&str> {
        self.tagged_leaves().map(|leaf| leaf.word).collect()
    }

    /// Indented outline, one node per line, two spaces per level.
    pub fn render_outline(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root(), 0usize)];

        while let Some((node, depth)) = stack.pop() {
            for _ in 0..depth {
                out.push_str("  ");
            }
            out.push_str(self.label(node));
            out.push('\n');
            for &child in self.children(node).iter().rev() {
                stack.push((child, depth + 1));
            }
        }

        out
    }
}

/// A leaf as seen by the flattener: its word and the label directly above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggedLeaf<'a> {
    pub label: &'a str,
    pub word: &'a str,
}

/// Pre-order walk over a tree's leaves using an explicit stack.
///
/// Each frame is `(node, next child to visit)`. For every child of the node
/// on top of the stack the child is reported if it is a leaf, and descended
/// into otherwise, matching a recursive walk over children in order.
#[derive(Debug, Clone)]
pub struct TaggedLeaves<'a> {
    tree: &'a ParseTree,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> Iterator for TaggedLeaves<'a> {
    type Item = TaggedLeaf<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;

        while let Some(frame) = self.stack.last_mut() {
            let (node, next) = *frame;
            let children = tree.children(node);

            if next == children.len() {
                self.stack.pop();
                continue;
            }
            frame.1 += 1;

            let child = children[next];
            if tree.is_leaf(child) {
                return Some(TaggedLeaf {
                    label: tree.label(node),
                    word: tree.label(child),
                });
            }
            self.stack.push((child, 0));
        }

        None
    }
}

/// Incremental constructor for [`ParseTree`].
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    nodes: Vec<TreeNode>,
}

impl TreeBuilder {
    /// Start a tree with the given root label.
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            nodes: vec![TreeNode {
                label: root_label.into(),
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    /// Append a new child under `parent` and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` was not returned by this builder.
    pub fn push(&mut self, parent: NodeId, label: impl Into<String>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            label: label.into(),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Append a preterminal `(tag word)` under `parent`, returning the tag node.
    pub fn push_preterminal(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        word: impl Into<String>,
    ) -> NodeId {
        let tag_node = self.push(parent, tag);
        self.push(tag_node, word);
        tag_node
    }

    pub fn build(self) -> ParseTree {
        ParseTree { nodes: self.nodes }
    }
}
