//! Arena of NEDA nodes. The parent back-reference and the cursor's container
//! reference become indices into this arena rather than raw pointers or
//! lifetimes (Design Notes §9: "the arena+index form is safer when brackets
//! auto-resize based on siblings").

use super::node::{Node, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

#[derive(Debug, Default)]
pub struct NedaArena {
    slots: Vec<Option<Node>>,
    free: Vec<u32>,
}

impl NedaArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let node = Node::new(kind);
        if let Some(idx) = self.free.pop() {
            self.slots[idx as usize] = Some(node);
            NodeId(idx)
        } else {
            self.slots.push(Some(node));
            NodeId((self.slots.len() - 1) as u32)
        }
    }

    /// Frees a node and, transitively, every node it owns (composite operand
    /// containers), matching "removing a node from a container destroys its
    /// subtree transitively" (§3 Lifecycle).
    pub fn free(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.get(id).kind.owned_children();
        for child in children {
            self.free(child);
        }
        self.slots[id.0 as usize] = None;
        self.free.push(id.0);
    }

    pub fn get(&self, id: NodeId) -> &Node {
        self.slots[id.0 as usize].as_ref().expect("dangling NodeId")
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        self.slots[id.0 as usize].as_mut().expect("dangling NodeId")
    }
}
