/// How a DELETE treats directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Remove a single entry; directories must be empty.
    Single,
    /// Remove the whole subtree.
    Recursive,
}

impl DeleteMode {
    /// Only the literal `recursive=true` enables recursive deletion.
    pub fn from_query(recursive: Option<&str>) -> Self {
        match recursive {
            Some("true") => Self::Recursive,
            _ => Self::Single,
        }
    }

    pub fn is_recursive(self) -> bool {
        self == Self::Recursive
    }
}

#[cfg(test)]
mod tests {
    use super::DeleteMode;

    #[test]
    fn only_true_is_recursive() {
        assert_eq!(DeleteMode::from_query(Some("true")), DeleteMode::Recursive);
        assert_eq!(DeleteMode::from_query(Some("TRUE")), DeleteMode::Single);
        assert_eq!(DeleteMode::from_query(Some("1")), DeleteMode::Single);
        assert_eq!(DeleteMode::from_query(None), DeleteMode::Single);
    }
}
