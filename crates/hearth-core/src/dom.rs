//! Display tree handed from widgets to the host.
//!
//! Widgets return a small tree of nodes; the host decides how to paint
//! them. Class names follow the dashboard stylesheet conventions.

/// A single node in a widget's display tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayNode {
    pub classes: Vec<String>,
    pub text: Option<String>,
    pub children: Vec<DisplayNode>,
}

impl DisplayNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a space-separated class string.
    pub fn class(mut self, classes: impl AsRef<str>) -> Self {
        self.classes
            .extend(classes.as_ref().split_whitespace().map(str::to_string));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: DisplayNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = DisplayNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Depth-first search for the first node carrying `class`.
    pub fn find(&self, class: &str) -> Option<&DisplayNode> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(class))
    }

    /// Concatenated text of this node and its descendants, in order.
    pub fn flat_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Render the tree as indented text for terminal hosts.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out, 0);
        out
    }

    fn write_text(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let classes = self.classes.join(" ");
        match &self.text {
            Some(text) => out.push_str(&format!("{}[{}] {}\n", indent, classes, text)),
            None => out.push_str(&format!("{}[{}]\n", indent, classes)),
        }
        for child in &self.children {
            child.write_text(out, depth + 1);
        }
    }
}
