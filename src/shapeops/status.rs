// Red-black tree holding the segments that currently cross the sweep line, bottom to top.
//
// The ordering of two segments depends on where the sweep line is, so it can't be expressed as
// a plain Ord key; instead the comparison is handed to insert(), the only operation that needs
// it.  Nodes live in a Vec and refer to each other by index, and a node keeps its index for as
// long as it's in the tree, so events can hold on to their node and find their neighbors later.

use std::cmp::Ordering;

use super::event::EventId;

pub type NodeId = usize;

// Sentinel leaf.  Its parent link is scratch space during removal
const NIL: NodeId = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Clone, Debug)]
struct Node {
    key: EventId,
    parent: NodeId,
    left: NodeId,
    right: NodeId,
    color: Color,
}

impl Node {
    fn new(key: EventId) -> Self {
        return Node{ key, parent: NIL, left: NIL, right: NIL, color: Color::Black };
    }
}

#[derive(Debug)]
pub struct StatusTree {
    nodes: Vec<Node>,
    root: NodeId,
    free: Vec<NodeId>,
    len: usize,
}

impl StatusTree {
    pub fn new() -> Self {
        return StatusTree{
            nodes: vec![Node::new(EventId(usize::MAX))],
            root: NIL,
            free: Vec::new(),
            len: 0,
        };
    }

    pub fn len(&self) -> usize {
        return self.len;
    }

    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    pub fn key(&self, node: NodeId) -> EventId {
        return self.nodes[node].key;
    }

    /// Insert a key, returning the node that now holds it
    pub fn insert<F>(&mut self, key: EventId, cmp: &F) -> NodeId
    where F: Fn(EventId, EventId) -> Ordering
    {
        let z = self.alloc(key);

        let mut parent = NIL;
        let mut x = self.root;
        let mut goes_left = false;
        while x != NIL {
            parent = x;
            goes_left = cmp(key, self.nodes[x].key) == Ordering::Less;
            x = if goes_left { self.nodes[x].left } else { self.nodes[x].right };
        }

        self.nodes[z].parent = parent;
        if parent == NIL {
            self.root = z;
        }
        else if goes_left {
            self.nodes[parent].left = z;
        }
        else {
            self.nodes[parent].right = z;
        }

        self.insert_fixup(z);
        self.len += 1;
        return z;
    }

    pub fn remove(&mut self, z: NodeId) {
        debug_assert!(z != NIL);
        let mut y = z;
        let mut y_color = self.nodes[y].color;
        let x;
        if self.nodes[z].left == NIL {
            x = self.nodes[z].right;
            self.transplant(z, x);
        }
        else if self.nodes[z].right == NIL {
            x = self.nodes[z].left;
            self.transplant(z, x);
        }
        else {
            y = self.minimum(self.nodes[z].right);
            y_color = self.nodes[y].color;
            x = self.nodes[y].right;
            if self.nodes[y].parent == z {
                self.nodes[x].parent = y;
            }
            else {
                self.transplant(y, x);
                let z_right = self.nodes[z].right;
                self.nodes[y].right = z_right;
                self.nodes[z_right].parent = y;
            }
            self.transplant(z, y);
            let z_left = self.nodes[z].left;
            self.nodes[y].left = z_left;
            self.nodes[z_left].parent = y;
            self.nodes[y].color = self.nodes[z].color;
        }

        if y_color == Color::Black {
            self.remove_fixup(x);
        }
        self.nodes[NIL].parent = NIL;

        self.nodes[z] = Node::new(EventId(usize::MAX));
        self.free.push(z);
        self.len -= 1;
    }

    pub fn first(&self) -> Option<NodeId> {
        if self.root == NIL {
            return None;
        }
        return Some(self.minimum(self.root));
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<NodeId> {
        if self.root == NIL {
            return None;
        }
        return Some(self.maximum(self.root));
    }

    /// The node immediately below this one
    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        let left = self.nodes[node].left;
        if left != NIL {
            return Some(self.maximum(left));
        }
        let mut child = node;
        let mut parent = self.nodes[node].parent;
        while parent != NIL && child == self.nodes[parent].left {
            child = parent;
            parent = self.nodes[parent].parent;
        }
        return if parent == NIL { None } else { Some(parent) };
    }

    /// The node immediately above this one
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        let right = self.nodes[node].right;
        if right != NIL {
            return Some(self.minimum(right));
        }
        let mut child = node;
        let mut parent = self.nodes[node].parent;
        while parent != NIL && child == self.nodes[parent].right {
            child = parent;
            parent = self.nodes[parent].parent;
        }
        return if parent == NIL { None } else { Some(parent) };
    }

    /// Keys from bottom to top
    pub fn keys(&self) -> Vec<EventId> {
        let mut ret = Vec::with_capacity(self.len);
        let mut cursor = self.first();
        while let Some(node) = cursor {
            ret.push(self.nodes[node].key);
            cursor = self.next(node);
        }
        return ret;
    }

    // -------------------------------------------------------------------------------------------
    // internals

    fn alloc(&mut self, key: EventId) -> NodeId {
        let mut node = Node::new(key);
        node.color = Color::Red;
        if let Some(id) = self.free.pop() {
            self.nodes[id] = node;
            return id;
        }
        self.nodes.push(node);
        return self.nodes.len() - 1;
    }

    fn minimum(&self, mut node: NodeId) -> NodeId {
        while self.nodes[node].left != NIL {
            node = self.nodes[node].left;
        }
        return node;
    }

    fn maximum(&self, mut node: NodeId) -> NodeId {
        while self.nodes[node].right != NIL {
            node = self.nodes[node].right;
        }
        return node;
    }

    fn color(&self, node: NodeId) -> Color {
        return self.nodes[node].color;
    }

    fn set_color(&mut self, node: NodeId, color: Color) {
        self.nodes[node].color = color;
    }

    fn rotate_left(&mut self, x: NodeId) {
        let y = self.nodes[x].right;
        let y_left = self.nodes[y].left;
        self.nodes[x].right = y_left;
        if y_left != NIL {
            self.nodes[y_left].parent = x;
        }
        self.replace_child(x, y);
        self.nodes[y].left = x;
        self.nodes[x].parent = y;
    }

    fn rotate_right(&mut self, x: NodeId) {
        let y = self.nodes[x].left;
        let y_right = self.nodes[y].right;
        self.nodes[x].left = y_right;
        if y_right != NIL {
            self.nodes[y_right].parent = x;
        }
        self.replace_child(x, y);
        self.nodes[y].right = x;
        self.nodes[x].parent = y;
    }

    /// Hook `new` into the place `old` occupies under old's parent
    fn replace_child(&mut self, old: NodeId, new: NodeId) {
        let parent = self.nodes[old].parent;
        self.nodes[new].parent = parent;
        if parent == NIL {
            self.root = new;
        }
        else if self.nodes[parent].left == old {
            self.nodes[parent].left = new;
        }
        else {
            self.nodes[parent].right = new;
        }
    }

    fn transplant(&mut self, u: NodeId, v: NodeId) {
        // v may be NIL, in which case its parent link is what remove_fixup starts from
        self.replace_child(u, v);
    }

    fn insert_fixup(&mut self, mut z: NodeId) {
        while self.color(self.nodes[z].parent) == Color::Red {
            let parent = self.nodes[z].parent;
            let grandparent = self.nodes[parent].parent;
            if parent == self.nodes[grandparent].left {
                let uncle = self.nodes[grandparent].right;
                if self.color(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    z = grandparent;
                }
                else {
                    if z == self.nodes[parent].right {
                        z = parent;
                        self.rotate_left(z);
                    }
                    let parent = self.nodes[z].parent;
                    let grandparent = self.nodes[parent].parent;
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_right(grandparent);
                }
            }
            else {
                let uncle = self.nodes[grandparent].left;
                if self.color(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    z = grandparent;
                }
                else {
                    if z == self.nodes[parent].left {
                        z = parent;
                        self.rotate_right(z);
                    }
                    let parent = self.nodes[z].parent;
                    let grandparent = self.nodes[parent].parent;
                    self.set_color(parent, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    self.rotate_left(grandparent);
                }
            }
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    fn remove_fixup(&mut self, mut x: NodeId) {
        while x != self.root && self.color(x) == Color::Black {
            let parent = self.nodes[x].parent;
            if x == self.nodes[parent].left {
                let mut w = self.nodes[parent].right;
                if self.color(w) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left(parent);
                    w = self.nodes[parent].right;
                }
                if self.color(self.nodes[w].left) == Color::Black && self.color(self.nodes[w].right) == Color::Black {
                    self.set_color(w, Color::Red);
                    x = parent;
                }
                else {
                    if self.color(self.nodes[w].right) == Color::Black {
                        let w_left = self.nodes[w].left;
                        self.set_color(w_left, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_right(w);
                        w = self.nodes[parent].right;
                    }
                    self.set_color(w, self.color(parent));
                    self.set_color(parent, Color::Black);
                    let w_right = self.nodes[w].right;
                    self.set_color(w_right, Color::Black);
                    self.rotate_left(parent);
                    x = self.root;
                }
            }
            else {
                let mut w = self.nodes[parent].left;
                if self.color(w) == Color::Red {
                    self.set_color(w, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right(parent);
                    w = self.nodes[parent].left;
                }
                if self.color(self.nodes[w].right) == Color::Black && self.color(self.nodes[w].left) == Color::Black {
                    self.set_color(w, Color::Red);
                    x = parent;
                }
                else {
                    if self.color(self.nodes[w].left) == Color::Black {
                        let w_right = self.nodes[w].right;
                        self.set_color(w_right, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_left(w);
                        w = self.nodes[parent].left;
                    }
                    self.set_color(w, self.color(parent));
                    self.set_color(parent, Color::Black);
                    let w_left = self.nodes[w].left;
                    self.set_color(w_left, Color::Black);
                    self.rotate_right(parent);
                    x = self.root;
                }
            }
        }
        self.set_color(x, Color::Black);
    }
}

impl Default for StatusTree {
    fn default() -> Self {
        Self::new()
    }
}
