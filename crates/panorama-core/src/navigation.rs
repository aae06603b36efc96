use fnv::FnvHashMap;

/// Static trigger-identifier → destination mapping.
#[derive(Clone, Debug, Default)]
pub struct NavigationMap {
    routes: FnvHashMap<String, String>,
}

impl NavigationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, destination: impl Into<String>) -> Self {
        self.routes.insert(id.into(), destination.into());
        self
    }

    #[inline]
    pub fn destination(&self, id: &str) -> Option<&str> {
        self.routes.get(id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Identifiers in sorted order.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.routes.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact() {
        let nav = NavigationMap::new()
            .with("Mars", "Mars.html")
            .with("Moon", "Moon.html");
        assert_eq!(nav.destination("Mars"), Some("Mars.html"));
        assert_eq!(nav.destination("mars"), None);
        assert_eq!(nav.ids(), vec!["Mars".to_string(), "Moon".to_string()]);
    }
}
