use tracing::debug;

use crate::asset_key::CanonicalKey;
use crate::content::{AssetSlot, ContentAsset};

use super::handler::{bind_slot, AssetHandler, Binding, HandlerContext};
use super::{PropagationError, PropagationResult};

pub type CandidateProbe<W, C> = fn(&mut W) -> Vec<&mut C>;
pub type CategoryProbe<C> = fn(&C) -> Option<&str>;
pub type CandidateSlot<C, T> = fn(&mut C) -> &mut AssetSlot<T>;

pub struct CategoryScan<W, C, T> {
    namespace: CanonicalKey,
    candidates: CandidateProbe<W, C>,
    category: CategoryProbe<C>,
    target: CandidateSlot<C, T>,
    binding: Binding,
}

impl<W, C, T> CategoryScan<W, C, T> {
    pub fn new(
        namespace: &str,
        candidates: CandidateProbe<W, C>,
        category: CategoryProbe<C>,
        target: CandidateSlot<C, T>,
        binding: Binding,
    ) -> Self {
        Self {
            namespace: CanonicalKey::normalize(namespace),
            candidates,
            category,
            target,
            binding,
        }
    }

    pub fn namespace(&self) -> &CanonicalKey {
        &self.namespace
    }
}

impl<W, C, T: ContentAsset> AssetHandler<W> for CategoryScan<W, C, T> {
    fn label(&self) -> &'static str {
        match self.binding {
            Binding::Eager => "scan_eager",
            Binding::Lazy => "scan_lazy",
        }
    }

    fn apply(&self, cx: HandlerContext<'_, W>) -> Result<PropagationResult, PropagationError> {
        if !cx.key.starts_with(&self.namespace) {
            return Ok(PropagationResult::NotApplicable);
        }

        let category = self.category;
        let matched = (self.candidates)(cx.world)
            .into_iter()
            .filter(|candidate| {
                category(&**candidate)
                    .is_some_and(|name| self.namespace.join(name) == *cx.key)
            })
            .collect::<Vec<_>>();
        if matched.is_empty() {
            return Ok(PropagationResult::NotApplicable);
        }

        let slot = bind_slot::<T>(self.binding, cx.content, cx.key)?;
        let matched_count = matched.len();
        for candidate in matched {
            *(self.target)(candidate) = slot.clone();
        }
        debug!(
            key = %cx.key,
            matched_count,
            binding = ?self.binding,
            "asset_broadcast"
        );
        Ok(PropagationResult::Applied)
    }
}
