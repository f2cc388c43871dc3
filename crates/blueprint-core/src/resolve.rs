//! Link resolution
//!
//! A link declares that the location at its source equals whatever ends up at
//! its target. Targets may themselves pass through other link sources, so a
//! target is rewritten until no prefix of it is a pending link source.
//!
//! Values are copied when links are applied, so a link whose target holds a
//! container must run after every link writing beneath that target. See
//! [`apply_order`].

use crate::config::MAX_LINK_DEPTH;
use crate::error::LinkError;
use crate::path::PathAddress;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Link waiting for resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLink {
    /// Location to assign
    pub source: PathAddress,
    /// Location to read from
    pub target: PathAddress,
}

impl PendingLink {
    /// Create link
    #[inline]
    #[must_use]
    pub fn new(source: PathAddress, target: PathAddress) -> Self {
        Self { source, target }
    }
}

/// Link with both ends rewritten through the other links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    /// Source as declared, used when reporting errors
    pub declared: PathAddress,
    /// Location actually assigned
    pub source: PathAddress,
    /// Location actually read
    pub target: PathAddress,
}

/// Resolves link targets against a set of pending links keyed by rendered source
#[derive(Debug, Clone, Copy)]
pub struct LinkResolver<'a> {
    links: &'a IndexMap<String, PendingLink>,
    max_depth: usize,
}

impl<'a> LinkResolver<'a> {
    /// Create resolver over `links`
    #[inline]
    #[must_use]
    pub fn new(links: &'a IndexMap<String, PendingLink>) -> Self {
        Self {
            links,
            max_depth: MAX_LINK_DEPTH,
        }
    }

    /// With a hop bound other than [`MAX_LINK_DEPTH`]
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Final location of `target`
    ///
    /// The link that declared `target` counts as the first hop, each further
    /// redirection as one more.
    ///
    /// # Errors
    /// Returns [`LinkError::DepthExceeded`] when more than `max_depth` hops
    /// are needed, which includes every cycle.
    pub fn resolve(&self, target: &PathAddress) -> Result<PathAddress, LinkError> {
        let mut current = target.clone();
        let mut hops = 1;

        loop {
            if hops > self.max_depth {
                return Err(LinkError::DepthExceeded {
                    target: current,
                    max: self.max_depth,
                });
            }

            match self.redirect(&current) {
                Some(next) => {
                    current = next;
                    hops += 1;
                }
                None => return Ok(current),
            }
        }
    }

    /// Rewrite both ends of `link`
    ///
    /// The target is resolved fully. The source keeps its last segment and
    /// only its parent is resolved, so `w.k` with `w` linked to `m` assigns
    /// `m.k` while `w` itself is still assigned by its own link.
    ///
    /// # Errors
    /// Returns [`LinkError::DepthExceeded`] if either end cannot be resolved
    pub fn resolve_link(&self, link: &PendingLink) -> Result<ResolvedLink, LinkError> {
        let target = self.resolve(&link.target)?;
        let source = match (link.source.parent(), link.source.last()) {
            (Some(parent), Some(last)) => self.resolve(&parent)?.child(last),
            _ => link.source.clone(),
        };

        Ok(ResolvedLink {
            declared: link.source.clone(),
            source,
            target,
        })
    }

    /// Rewrite `target` through the link on its shortest matching prefix
    fn redirect(&self, target: &PathAddress) -> Option<PathAddress> {
        let mut key = String::new();

        for (i, segment) in target.iter().enumerate() {
            if i > 0 {
                key.push('.');
            }
            key.push_str(segment);

            if let Some(link) = self.links.get(&key) {
                return Some(link.target.concat(&target.suffix(i + 1)));
            }
        }

        None
    }
}

/// Order in which resolved links must be applied
///
/// A link reading `t` runs after every other link assigning `t` or a location
/// beneath it. Ties keep declaration order. Links caught in a dependency cycle
/// are appended in declaration order.
#[must_use]
pub fn apply_order(links: &[ResolvedLink]) -> Vec<usize> {
    let mut waiting_on = vec![0usize; links.len()];
    let mut unblocks: Vec<Vec<usize>> = vec![Vec::new(); links.len()];

    for (reader, read) in links.iter().enumerate() {
        for (writer, write) in links.iter().enumerate() {
            if reader != writer && read.target.is_prefix_of(&write.source) {
                waiting_on[reader] += 1;
                unblocks[writer].push(reader);
            }
        }
    }

    let mut ready: BTreeSet<usize> = (0..links.len()).filter(|&i| waiting_on[i] == 0).collect();
    let mut order = Vec::with_capacity(links.len());

    while let Some(next) = ready.pop_first() {
        order.push(next);
        for &reader in &unblocks[next] {
            waiting_on[reader] -= 1;
            if waiting_on[reader] == 0 {
                ready.insert(reader);
            }
        }
    }

    if order.len() < links.len() {
        let cyclic: Vec<usize> = (0..links.len()).filter(|&i| waiting_on[i] > 0).collect();
        for &i in &cyclic {
            tracing::warn!(
                src = %links[i].declared,
                target = %links[i].target,
                "link depends on its own result, applying in declaration order"
            );
        }
        order.extend(cyclic);
    }

    order
}
