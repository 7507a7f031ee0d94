//! Loading placeholder bookkeeping.
//!
//! At initialization the host's content container is scanned once for a
//! loading template (a node carrying the host's loading marker). The template
//! is detached from the live tree and kept here; every outstanding fetch
//! mounts its own clone of it at the edge being loaded and drops it when the
//! fetch settles.
//!
//! Hosts without a template still work: placeholders are simply skipped and
//! contribute no height.

use crate::host::Host;

/// A mounted loading placeholder and the height it occupied when mounted.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder<E> {
    /// The mounted clone of the template.
    pub element: E,
    /// Measured height right after mounting.
    pub height: f64,
}

/// Holds the loading template and mounts placeholders cloned from it.
#[derive(Debug, Clone)]
pub struct LoadingSpinner<E> {
    template: Option<E>,
}

impl<E> Default for LoadingSpinner<E> {
    fn default() -> Self {
        Self { template: None }
    }
}

impl<E: Clone> LoadingSpinner<E> {
    /// Creates a spinner with no template collected yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Detaches the loading template from the host. A template collected
    /// earlier is kept when the host has none left.
    pub fn collect<H: Host<Element = E>>(&mut self, host: &mut H) {
        if let Some(template) = host.take_loading_template() {
            self.template = Some(template);
        }
        if self.template.is_none() {
            tracing::debug!("spinner: no loading template found");
        }
    }

    /// Whether a template is available.
    pub fn has_template(&self) -> bool {
        self.template.is_some()
    }

    /// Mounts a placeholder right before `next` (or first).
    pub fn insert_before<H: Host<Element = E>>(
        &self,
        host: &mut H,
        next: Option<&E>,
    ) -> Option<Placeholder<E>> {
        let element = self.instantiate(host)?;
        host.insert_before(next, std::slice::from_ref(&element));
        let height = host.element_height(&element);
        Some(Placeholder { element, height })
    }

    /// Mounts a placeholder right after `prev` (or last).
    pub fn insert_after<H: Host<Element = E>>(
        &self,
        host: &mut H,
        prev: Option<&E>,
    ) -> Option<Placeholder<E>> {
        let element = self.instantiate(host)?;
        host.insert_after(prev, std::slice::from_ref(&element));
        let height = host.element_height(&element);
        Some(Placeholder { element, height })
    }

    /// Unmounts a placeholder, returning the height it had when mounted.
    pub fn remove<H: Host<Element = E>>(host: &mut H, placeholder: Placeholder<E>) -> f64 {
        host.remove(&placeholder.element);
        placeholder.height
    }

    fn instantiate<H: Host<Element = E>>(&self, host: &mut H) -> Option<E> {
        let template = self.template.as_ref()?;
        Some(host.clone_element(template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{MemoryHost, NodeKind, SimNode};

    #[test]
    fn test_collect_detaches_template() {
        let mut host = MemoryHost::new(300.0).with_loading_template(24.0);
        assert_eq!(host.nodes().len(), 1);

        let mut spinner = LoadingSpinner::new();
        spinner.collect(&mut host);

        assert!(spinner.has_template());
        assert!(host.nodes().is_empty());
        assert_eq!(host.content_height(), 0.0);
    }

    #[test]
    fn test_placeholders_are_independent_clones() {
        let mut host = MemoryHost::new(300.0).with_loading_template(24.0);
        let mut spinner = LoadingSpinner::new();
        spinner.collect(&mut host);

        let first = spinner.insert_after(&mut host, None).unwrap();
        let second = spinner.insert_before(&mut host, None).unwrap();
        assert_ne!(first.element, second.element);
        assert_eq!(first.height, 24.0);
        assert_eq!(host.content_height(), 48.0);

        let removed = LoadingSpinner::remove(&mut host, first);
        assert_eq!(removed, 24.0);
        assert_eq!(host.nodes().len(), 1);
        assert_eq!(host.nodes()[0].kind(), NodeKind::Loading);
    }

    #[test]
    fn test_no_template_means_no_placeholder() {
        let mut host = MemoryHost::new(300.0);
        let mut spinner = LoadingSpinner::<SimNode>::new();
        spinner.collect(&mut host);

        assert!(!spinner.has_template());
        assert!(spinner.insert_after(&mut host, None).is_none());
        assert!(host.nodes().is_empty());
    }
}
