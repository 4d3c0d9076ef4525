use std::collections::HashSet;

/// Name-based inclusion test shared by classes and functions
///
/// An empty include set lets every name through; the exclude set always wins.
pub fn included(name: &str, include: &HashSet<String>, exclude: &HashSet<String>) -> bool {
    (include.is_empty() || include.contains(name)) && !exclude.contains(name)
}

/// The four name sets that decide which definitions reach the digest
///
/// Class sets apply to class definitions; method sets apply to every
/// function definition, whether it sits in a class or at module level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    include_classes: HashSet<String>,
    include_methods: HashSet<String>,
    exclude_classes: HashSet<String>,
    exclude_methods: HashSet<String>,
}

fn name_set<I, S>(names: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(Into::into).collect()
}

impl FilterSpec {
    /// A filter that accepts everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_classes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_classes = name_set(names);
        self
    }

    pub fn with_include_methods<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_methods = name_set(names);
        self
    }

    pub fn with_exclude_classes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_classes = name_set(names);
        self
    }

    pub fn with_exclude_methods<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_methods = name_set(names);
        self
    }

    pub fn includes_class(&self, name: &str) -> bool {
        included(name, &self.include_classes, &self.exclude_classes)
    }

    pub fn includes_method(&self, name: &str) -> bool {
        included(name, &self.include_methods, &self.exclude_methods)
    }

    /// True when no set restricts anything
    pub fn is_unrestricted(&self) -> bool {
        self.include_classes.is_empty()
            && self.include_methods.is_empty()
            && self.exclude_classes.is_empty()
            && self.exclude_methods.is_empty()
    }
}
