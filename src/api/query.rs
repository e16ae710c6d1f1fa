use url::Url;

/// Query parameters of a request.
///
/// Only parameters that carry a value are kept, an absent value never ends up
/// as an empty or placeholder parameter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.pairs.push((key, value.to_string()));
        self
    }

    pub fn opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Replace the query part of `url` with these parameters.
    pub fn apply(&self, url: &mut Url) {
        url.set_query(None);

        if !self.is_empty() {
            url.query_pairs_mut().extend_pairs(self.pairs());
        }
    }
}
