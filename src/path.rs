//! A location inside a tree, rendered like `[0].expression.property`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TreePath(pub Vec<PathSegment>);

impl TreePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn push_index(&mut self, index: usize) {
        self.0.push(PathSegment::Index(index));
    }

    pub fn push_key(&mut self, key: &str) {
        self.0.push(PathSegment::Key(key.to_string()));
    }

    pub fn pop(&mut self) {
        self.0.pop();
    }

    /// The attribute name this position sits under, if any.
    pub fn last_key(&self) -> Option<&str> {
        self.0.iter().rev().find_map(|segment| match segment {
            PathSegment::Key(key) => Some(key.as_str()),
            PathSegment::Index(_) => None,
        })
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let mut path = TreePath::root();
        assert_eq!(path.to_string(), "<root>");
        path.push_index(0);
        path.push_key("expression");
        path.push_key("property");
        assert_eq!(path.to_string(), "[0].expression.property");
        path.pop();
        assert_eq!(path.last_key(), Some("expression"));
    }
}
