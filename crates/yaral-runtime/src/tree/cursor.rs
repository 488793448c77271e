use super::node::{Children, Node};

struct Frame<'t> {
    node: Node<'t>,
    /// Remaining siblings after `node`; `None` at the cursor's root.
    siblings: Option<Children<'t>>,
}

/// Stateful walker over a subtree.
pub struct TreeCursor<'t> {
    frames: Vec<Frame<'t>>,
}

impl<'t> TreeCursor<'t> {
    pub fn new(node: Node<'t>) -> Self {
        Self {
            frames: vec![Frame {
                node,
                siblings: None,
            }],
        }
    }

    pub fn node(&self) -> Node<'t> {
        self.current().node.clone()
    }

    /// Depth below the node the cursor started at.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    pub fn field_name(&self) -> Option<&'t str> {
        self.current().node.field_name()
    }

    pub fn goto_first_child(&mut self) -> bool {
        let mut children = self.current().node.children();
        match children.next() {
            Some(node) => {
                self.frames.push(Frame {
                    node,
                    siblings: Some(children),
                });
                true
            }
            None => false,
        }
    }

    pub fn goto_next_sibling(&mut self) -> bool {
        let Some(frame) = self.frames.last_mut() else {
            return false;
        };
        let Some(siblings) = frame.siblings.as_mut() else {
            return false;
        };
        match siblings.next() {
            Some(node) => {
                frame.node = node;
                true
            }
            None => false,
        }
    }

    pub fn goto_parent(&mut self) -> bool {
        if self.frames.len() <= 1 {
            return false;
        }
        self.frames.pop();
        true
    }

    fn current(&self) -> &Frame<'t> {
        // The root frame is never popped.
        &self.frames[self.frames.len() - 1]
    }
}

/// Pre-order iterator over a subtree, the starting node first.
pub struct Descendants<'t> {
    cursor: TreeCursor<'t>,
    first: Option<Node<'t>>,
    done: bool,
}

impl<'t> Descendants<'t> {
    pub(crate) fn new(node: Node<'t>) -> Self {
        Self {
            cursor: TreeCursor::new(node.clone()),
            first: Some(node),
            done: false,
        }
    }

    fn advance(&mut self) -> Option<Node<'t>> {
        if self.cursor.goto_first_child() {
            return Some(self.cursor.node());
        }
        loop {
            if self.cursor.goto_next_sibling() {
                return Some(self.cursor.node());
            }
            if !self.cursor.goto_parent() {
                return None;
            }
        }
    }
}

impl<'t> Iterator for Descendants<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        if let Some(node) = self.first.take() {
            return Some(node);
        }
        if self.done {
            return None;
        }
        let next = self.advance();
        self.done = next.is_none();
        next
    }
}
