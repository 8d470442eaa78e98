use super::SyntaxNode;

/// An owned, in-memory syntax tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedNode {
    kind: String,
    children: Vec<OwnedNode>,
    text: Option<String>,
}

impl OwnedNode {
    /// Creates an inner node with the given children.
    pub fn branch<K, I>(kind: K, children: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = OwnedNode>,
    {
        Self {
            kind: kind.into(),
            children: children.into_iter().collect(),
            text: None,
        }
    }

    /// Creates a leaf token carrying `text`.
    pub fn leaf<K: Into<String>, T: Into<String>>(kind: K, text: T) -> Self {
        Self {
            kind: kind.into(),
            children: Vec::new(),
            text: Some(text.into()),
        }
    }

    /// Creates a leaf token whose text is its own kind, like a keyword or
    /// punctuation token.
    pub fn token<K: Into<String>>(kind: K) -> Self {
        let kind = kind.into();
        Self {
            text: Some(kind.clone()),
            kind,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn children(&self) -> &[OwnedNode] {
        &self.children
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl SyntaxNode for &OwnedNode {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn children(&self) -> Vec<Self> {
        let node = *self;
        node.children.iter().collect()
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}
