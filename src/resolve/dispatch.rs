//! Routing of entries to resolvers.

use std::sync::Arc;

use log::debug;

use super::{GenericResolver, IncrementProbe, ResolutionOutcome, Resolver};
use crate::classify::RedirectClassifier;
use crate::fetch::PageFetcher;

/// Ordered resolver list with the generic resolver as the catch-all.
pub struct Dispatcher {
    resolvers: Vec<Box<dyn Resolver>>,
    fallback: GenericResolver,
}

impl Dispatcher {
    pub fn new(fetcher: Arc<dyn PageFetcher>, classifier: Arc<RedirectClassifier>) -> Self {
        Self {
            resolvers: Vec::new(),
            fallback: GenericResolver::new(fetcher, classifier),
        }
    }

    /// Dispatcher with one increment probe per family, in the given order.
    pub fn with_increment_families(
        fetcher: Arc<dyn PageFetcher>,
        classifier: Arc<RedirectClassifier>,
        families: &[String],
    ) -> Result<Self, regex::Error> {
        let mut dispatcher = Self::new(fetcher.clone(), classifier);
        for family in families.iter().filter(|f| !f.trim().is_empty()) {
            let probe = IncrementProbe::new(family.trim(), fetcher.clone())?;
            dispatcher = dispatcher.with_resolver(Box::new(probe));
        }
        Ok(dispatcher)
    }

    /// Appends a resolver; earlier resolvers win.
    pub fn with_resolver(mut self, resolver: Box<dyn Resolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    pub fn resolver_for(&self, key: &str) -> &dyn Resolver {
        self.resolvers
            .iter()
            .find(|r| r.matches(key))
            .map(|r| r.as_ref())
            .unwrap_or(&self.fallback)
    }

    pub async fn resolve(&self, key: &str, url: &str) -> ResolutionOutcome {
        let resolver = self.resolver_for(key);
        debug!("[{}] Resolving {} with {}", key, url, resolver.name());
        resolver.resolve(key, url).await
    }
}
