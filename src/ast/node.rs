use super::kind::NodeKind;
use std::fmt;

/// Child-index sequence from the root to a node. Stable for the lifetime of a tree.
pub type NodePath = Vec<usize>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TNode {
    pub kind: NodeKind,
    pub line: Option<usize>,
    pub name: String,
    pub constant: String,
    pub children: Vec<TNode>,
}

impl TNode {
    pub fn new(kind: NodeKind, line: Option<usize>) -> Self {
        Self {
            kind,
            line,
            name: String::new(),
            constant: String::new(),
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: NodeKind, line: Option<usize>, children: Vec<TNode>) -> Self {
        Self {
            children,
            ..Self::new(kind, line)
        }
    }

    pub fn named(kind: NodeKind, line: Option<usize>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new(kind, line)
        }
    }

    pub fn variable(name: impl Into<String>, line: usize) -> Self {
        Self::named(NodeKind::Variable, Some(line), name)
    }

    pub fn constant(value: impl Into<String>, line: usize) -> Self {
        Self {
            constant: value.into(),
            ..Self::new(NodeKind::Constant, Some(line))
        }
    }

    pub fn binary(kind: NodeKind, line: usize, lhs: TNode, rhs: TNode) -> Self {
        Self::with_children(kind, Some(line), vec![lhs, rhs])
    }

    pub fn add_child(&mut self, child: TNode) {
        self.children.push(child);
    }

    /// Follows `path` down from this node.
    pub fn at(&self, path: &[usize]) -> Option<&TNode> {
        let mut node = self;
        for &idx in path {
            node = node.children.get(idx)?;
        }
        Some(node)
    }

    /// Visits every node in pre-order, left to right, together with its path.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&NodePath, &'a TNode),
    {
        let mut path = Vec::new();
        self.walk_from(&mut path, visit);
    }

    fn walk_from<'a, F>(&'a self, path: &mut NodePath, visit: &mut F)
    where
        F: FnMut(&NodePath, &'a TNode),
    {
        visit(path, self);
        for (idx, child) in self.children.iter().enumerate() {
            path.push(idx);
            child.walk_from(path, visit);
            path.pop();
        }
    }

    /// Names of every Variable node in this subtree.
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.walk(&mut |_, node| {
            if node.kind == NodeKind::Variable {
                names.push(node.name.as_str());
            }
        });
        names
    }

    /// Fully parenthesized expression text, e.g. `((a+b)*2)`. Leaves render bare.
    pub fn canonical(&self) -> String {
        match self.kind {
            NodeKind::Variable => self.name.clone(),
            NodeKind::Constant => self.constant.clone(),
            NodeKind::Not => format!("(!{})", self.children[0].canonical()),
            kind => format!(
                "({}{}{})",
                self.children[0].canonical(),
                kind.operator().unwrap_or_default(),
                self.children[1].canonical()
            ),
        }
    }

    /// Indented multi-line rendering of the tree.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.pretty_into(0, &mut out);
        out
    }

    fn pretty_into(&self, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.kind.to_string());
        if let Some(line) = self.line {
            out.push_str(&format!(" @{}", line));
        }
        if !self.name.is_empty() {
            out.push_str(&format!(" {}", self.name));
        }
        if !self.constant.is_empty() {
            out.push_str(&format!(" {}", self.constant));
        }
        out.push('\n');
        for child in &self.children {
            child.pretty_into(depth + 1, out);
        }
    }
}

impl fmt::Display for TNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ ", self.kind)?;
        match self.line {
            Some(line) => write!(f, "{}", line)?,
            None => write!(f, "-")?,
        }
        write!(f, "({}, {})", self.name, self.constant)?;
        if !self.children.is_empty() {
            write!(f, " : [")?;
            for (idx, child) in self.children.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", child)?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
