//! Element tree with lxml-style text/tail semantics.
//!
//! Elements carry two separate text payloads:
//! - **text**: character data before the first child element
//! - **tail**: character data after the element's closing tag, before its
//!   next sibling
//!
//! ```html
//! <div>
//!   TEXT HERE          <!-- this is div's "text" -->
//!   <span>inner</span>
//!   TAIL HERE          <!-- this is span's "tail" -->
//! </div>
//! ```
//!
//! Several cleaning passes branch on the emptiness of `text` or `tail` at
//! specific positions, so the split must not be flattened into a plain
//! child list.
//!
//! Nodes live in an arena owned by [`Document`]; a [`NodeId`] is a stable
//! index that survives every mutation, including detachment. Detached nodes
//! simply lose their parent link and drop out of serialization. The embed
//! whitelist is a set of `NodeId`s, so stability of ids across mutations is
//! a hard requirement: nodes are moved, never replaced.

/// Stable handle to a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    text: Option<String>,
    tail: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A contiguous range `[start, end)` of children under `node`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildrenSlice {
    pub node: NodeId,
    pub start: usize,
    pub end: usize,
}

/// A mutable element tree. Cloning a document preserves node ids.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

/// True when the optional string holds any non-whitespace character.
#[inline]
#[must_use]
pub fn str_has_content(text: Option<&str>) -> bool {
    text.is_some_and(|t| !t.trim().is_empty())
}

impl Document {
    /// Create a document whose root is a fresh element with the given tag.
    #[must_use]
    pub fn new(root_tag: &str) -> Self {
        let root = NodeData {
            tag: root_tag.to_string(),
            attrs: Vec::new(),
            text: None,
            tail: None,
            parent: None,
            children: Vec::new(),
        };
        Document { nodes: vec![root], root: NodeId(0) }
    }

    /// The current root element.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Re-root the document. The new root is detached from any parent.
    pub fn set_root(&mut self, node: NodeId) {
        self.detach(node);
        self.root = node;
    }

    /// Allocate a new, detached element.
    pub fn new_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            tag: tag.to_string(),
            attrs: Vec::new(),
            text: None,
            tail: None,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a new element and append it to `parent`.
    pub fn sub_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.new_element(tag);
        self.append(parent, id);
        id
    }

    // === Accessors ===

    #[must_use]
    pub fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    pub fn set_tag(&mut self, node: NodeId, tag: &str) {
        self.nodes[node.0].tag = tag.to_string();
    }

    #[must_use]
    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].text.as_deref()
    }

    pub fn set_text(&mut self, node: NodeId, text: Option<String>) {
        self.nodes[node.0].text = text;
    }

    #[must_use]
    pub fn tail(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].tail.as_deref()
    }

    pub fn set_tail(&mut self, node: NodeId, tail: Option<String>) {
        self.nodes[node.0].tail = tail;
    }

    /// True when the node's text has non-whitespace content.
    #[must_use]
    pub fn has_text(&self, node: NodeId) -> bool {
        str_has_content(self.text(node))
    }

    /// True when the node's tail has non-whitespace content.
    #[must_use]
    pub fn has_tail(&self, node: NodeId) -> bool {
        str_has_content(self.tail(node))
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Attribute names and values in insertion order. The order only
    /// matters for serialization stability.
    #[must_use]
    pub fn attrs(&self, node: NodeId) -> &[(String, String)] {
        &self.nodes[node.0].attrs
    }

    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0]
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let attrs = &mut self.nodes[node.0].attrs;
        if let Some(entry) = attrs.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            attrs.push((name.to_string(), value.to_string()));
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        self.nodes[node.0].attrs.retain(|(n, _)| n != name);
    }

    pub fn clear_attrs(&mut self, node: NodeId) {
        self.nodes[node.0].attrs.clear();
    }

    /// Position of `child` in `parent`'s child list.
    #[must_use]
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes[parent.0].children.iter().position(|&c| c == child)
    }

    // === Structural mutation ===

    /// Detach `node` from its parent, keeping its tail with it.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Append `child` to `parent` (detaching it from any previous parent).
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` at position `index` under `parent`.
    pub fn insert(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
    }

    /// Detach every child of `node` (their tails travel with them).
    pub fn remove_children(&mut self, node: NodeId) {
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    fn push_text(dst: &mut Option<String>, piece: &str) {
        match dst {
            Some(existing) => existing.push_str(piece),
            None => *dst = Some(piece.to_string()),
        }
    }

    /// Append a piece of character data to the node's text.
    pub fn append_to_text(&mut self, node: NodeId, piece: &str) {
        Self::push_text(&mut self.nodes[node.0].text, piece);
    }

    /// Append a piece of character data to the node's tail.
    pub fn append_to_tail(&mut self, node: NodeId, piece: &str) {
        Self::push_text(&mut self.nodes[node.0].tail, piece);
    }

    /// Remove the element but keep its children and text: both are merged
    /// into the parent at the element's position. The tail joins the last
    /// child, or the preceding text when there are no children.
    ///
    /// No-op on a node without a parent.
    pub fn drop_tag(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else { return };
        let Some(index) = self.index_of(parent, node) else { return };
        let prev = if index > 0 { Some(self.nodes[parent.0].children[index - 1]) } else { None };

        let text = self.nodes[node.0].text.take();
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            match prev {
                None => Self::push_text(&mut self.nodes[parent.0].text, &text),
                Some(prev) => Self::push_text(&mut self.nodes[prev.0].tail, &text),
            }
        }

        let tail = self.nodes[node.0].tail.take();
        if let Some(tail) = tail.filter(|t| !t.is_empty()) {
            if let Some(&last) = self.nodes[node.0].children.last() {
                Self::push_text(&mut self.nodes[last.0].tail, &tail);
            } else {
                match prev {
                    None => Self::push_text(&mut self.nodes[parent.0].text, &tail),
                    Some(prev) => Self::push_text(&mut self.nodes[prev.0].tail, &tail),
                }
            }
        }

        let grandchildren = std::mem::take(&mut self.nodes[node.0].children);
        for &child in &grandchildren {
            self.nodes[child.0].parent = Some(parent);
        }
        self.nodes[node.0].parent = None;
        self.nodes[parent.0]
            .children
            .splice(index..=index, grandchildren);
    }

    /// Remove the element and its whole subtree. The tail is preserved by
    /// joining it to the previous sibling or to the parent's text.
    ///
    /// No-op on a node without a parent.
    pub fn drop_tree(&mut self, node: NodeId) {
        let Some(parent) = self.parent(node) else { return };
        let Some(index) = self.index_of(parent, node) else { return };
        let prev = if index > 0 { Some(self.nodes[parent.0].children[index - 1]) } else { None };

        let tail = self.nodes[node.0].tail.take();
        if let Some(tail) = tail.filter(|t| !t.is_empty()) {
            match prev {
                None => Self::push_text(&mut self.nodes[parent.0].text, &tail),
                Some(prev) => Self::push_text(&mut self.nodes[prev.0].tail, &tail),
            }
        }

        self.nodes[parent.0].children.remove(index);
        self.nodes[node.0].parent = None;
    }

    // === Wrapping ===

    /// Replace `node` in its parent with a new element of `tag` containing
    /// `node`. The wrapper inherits the node's tail. Returns the wrapper;
    /// wrapping a parentless node leaves the wrapper detached (the caller
    /// may re-root).
    pub fn wrap_element_with_tag(&mut self, node: NodeId, tag: &str) -> NodeId {
        let wrapper = self.new_element(tag);
        let tail = self.nodes[node.0].tail.take();
        self.nodes[wrapper.0].tail = tail;
        if let Some(parent) = self.parent(node) {
            if let Some(index) = self.index_of(parent, node) {
                self.nodes[parent.0].children[index] = wrapper;
                self.nodes[wrapper.0].parent = Some(parent);
                self.nodes[node.0].parent = None;
            }
        }
        self.nodes[node.0].parent = Some(wrapper);
        self.nodes[wrapper.0].children.push(node);
        wrapper
    }

    /// Move all children and the leading text of `node` into a new single
    /// child element of `tag`. Returns the new child.
    pub fn wrap_element_content_with_tag(&mut self, node: NodeId, tag: &str) -> NodeId {
        let wrapper = self.new_element(tag);
        let children = std::mem::take(&mut self.nodes[node.0].children);
        for &child in &children {
            self.nodes[child.0].parent = Some(wrapper);
        }
        self.nodes[wrapper.0].children = children;
        let text = self.nodes[node.0].text.take();
        self.nodes[wrapper.0].text = text;
        self.nodes[wrapper.0].parent = Some(node);
        self.nodes[node.0].children.push(wrapper);
        wrapper
    }

    /// Move the children `[start, end)` of `slice.node` into a new element
    /// of `tag` inserted at position `start`. The new element inherits the
    /// tail of the last moved child. Returns the new element.
    pub fn wrap_children_slice(&mut self, slice: ChildrenSlice, tag: &str) -> NodeId {
        let ChildrenSlice { node: parent, start, end } = slice;
        let wrapper = self.new_element(tag);
        let content: Vec<NodeId> =
            self.nodes[parent.0].children[start..end].to_vec();
        if let Some(&last) = content.last() {
            let tail = self.nodes[last.0].tail.take();
            self.nodes[wrapper.0].tail = tail;
        }
        self.nodes[parent.0].children.drain(start..end);
        for &child in &content {
            self.nodes[child.0].parent = Some(wrapper);
        }
        self.nodes[wrapper.0].children = content;
        self.nodes[wrapper.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(start, wrapper);
        wrapper
    }

    // === Traversal ===

    /// Every node of the subtree in document order, `node` first.
    #[must_use]
    pub fn iter(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            out.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Every node of the subtree in post-order (children before parents).
    #[must_use]
    pub fn iter_post_order(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.post_order_into(node, &mut out);
        out
    }

    fn post_order_into(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children(node) {
            self.post_order_into(child, out);
        }
        out.push(node);
    }

    /// Descendants of `node` with the given tag, in document order.
    #[must_use]
    pub fn find_all(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        self.iter(node)
            .into_iter()
            .skip(1)
            .filter(|&n| self.tag(n) == tag)
            .collect()
    }

    /// Ancestors ordered by distance, nearest first. Stops after `max`
    /// entries, or right after `stop_at` (which is included).
    #[must_use]
    pub fn ancestors(
        &self,
        node: NodeId,
        max: Option<usize>,
        stop_at: Option<NodeId>,
    ) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            if let Some(max) = max {
                if out.len() >= max {
                    break;
                }
            }
            out.push(parent);
            current = parent;
            if stop_at == Some(current) {
                break;
            }
        }
        out
    }

    /// Descendants of `node` down to `max_level` (children are level 1), in
    /// document order. All descendants when no level is given.
    #[must_use]
    pub fn descendants(&self, node: NodeId, max_level: Option<usize>) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<(NodeId, usize)> =
            self.children(node).iter().rev().map(|&c| (c, 1)).collect();
        while let Some((current, level)) = stack.pop() {
            if let Some(max) = max_level {
                if level > max {
                    continue;
                }
            }
            out.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push((child, level + 1));
            }
        }
        out
    }

    /// The text immediately preceding the node: the parent's text for a
    /// first child, otherwise the previous sibling's tail.
    #[must_use]
    pub fn prev_text(&self, node: NodeId) -> &str {
        let Some(parent) = self.parent(node) else { return "" };
        let Some(index) = self.index_of(parent, node) else { return "" };
        if index == 0 {
            self.text(parent).unwrap_or("")
        } else {
            self.tail(self.children(parent)[index - 1]).unwrap_or("")
        }
    }

    /// True when the subtree holds no text at all and no element whose tag
    /// counts as content even when empty.
    #[must_use]
    pub fn is_empty_subtree(
        &self,
        node: NodeId,
        content_even_if_empty: &std::collections::HashSet<&'static str>,
    ) -> bool {
        let mut empty = true;
        for &child in self.children(node) {
            empty = self.is_empty_subtree(child, content_even_if_empty) && !self.has_tail(child);
            if !empty {
                break;
            }
        }
        !content_even_if_empty.contains(self.tag(node)) && empty && !self.has_text(node)
    }
}
