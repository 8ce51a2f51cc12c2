use std::marker::PhantomData;
use std::rc::Rc;

use crate::asset_key::CanonicalKey;
use crate::content::{AssetSlot, ContentAsset, LazyAsset, SharedLoader};
use crate::reflection::{field_mut, Reflect};

use super::{PropagationError, PropagationResult};

pub struct HandlerContext<'a, W> {
    pub key: &'a CanonicalKey,
    pub content: &'a SharedLoader,
    pub world: &'a mut W,
}

// `apply` overwrites its whole target or leaves the world untouched.
pub trait AssetHandler<W> {
    fn label(&self) -> &'static str;

    fn apply(&self, cx: HandlerContext<'_, W>) -> Result<PropagationResult, PropagationError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Eager,
    Lazy,
}

pub type SlotProbe<W, T> = fn(&mut W) -> Option<&mut AssetSlot<T>>;
pub type ReflectProbe<W> = fn(&mut W) -> Option<&mut dyn Reflect>;
pub type HandlerFn<W> =
    fn(HandlerContext<'_, W>) -> Result<PropagationResult, PropagationError>;

pub fn load_asset<T: ContentAsset>(
    content: &SharedLoader,
    key: &CanonicalKey,
) -> Result<T, PropagationError> {
    content
        .load::<T>(key)
        .map_err(|source| PropagationError::load(key, source))
}

pub fn bind_slot<T: ContentAsset>(
    binding: Binding,
    content: &SharedLoader,
    key: &CanonicalKey,
) -> Result<AssetSlot<T>, PropagationError> {
    match binding {
        Binding::Eager => load_asset(content, key).map(AssetSlot::Ready),
        Binding::Lazy => Ok(AssetSlot::Deferred(LazyAsset::from_loader(
            Rc::clone(content),
            key.clone(),
        ))),
    }
}

pub struct EagerBind<W, T> {
    target: SlotProbe<W, T>,
}

impl<W, T> EagerBind<W, T> {
    pub fn new(target: SlotProbe<W, T>) -> Self {
        Self { target }
    }
}

impl<W, T: ContentAsset> AssetHandler<W> for EagerBind<W, T> {
    fn label(&self) -> &'static str {
        "eager"
    }

    fn apply(&self, cx: HandlerContext<'_, W>) -> Result<PropagationResult, PropagationError> {
        let Some(slot) = (self.target)(cx.world) else {
            return Ok(PropagationResult::NotApplicable);
        };
        let value = load_asset::<T>(cx.content, cx.key)?;
        slot.set_ready(value);
        Ok(PropagationResult::Applied)
    }
}

pub struct LazyBind<W, T> {
    target: SlotProbe<W, T>,
}

impl<W, T> LazyBind<W, T> {
    pub fn new(target: SlotProbe<W, T>) -> Self {
        Self { target }
    }
}

impl<W, T: ContentAsset> AssetHandler<W> for LazyBind<W, T> {
    fn label(&self) -> &'static str {
        "lazy"
    }

    fn apply(&self, cx: HandlerContext<'_, W>) -> Result<PropagationResult, PropagationError> {
        let Some(slot) = (self.target)(cx.world) else {
            return Ok(PropagationResult::NotApplicable);
        };
        slot.defer(LazyAsset::from_loader(Rc::clone(cx.content), cx.key.clone()));
        Ok(PropagationResult::Applied)
    }
}

pub struct ReflectedBind<W, T> {
    owner: ReflectProbe<W>,
    field: &'static str,
    binding: Binding,
    asset: PhantomData<fn() -> T>,
}

impl<W, T> ReflectedBind<W, T> {
    pub fn new(owner: ReflectProbe<W>, field: &'static str, binding: Binding) -> Self {
        Self {
            owner,
            field,
            binding,
            asset: PhantomData,
        }
    }
}

impl<W, T: ContentAsset> AssetHandler<W> for ReflectedBind<W, T> {
    fn label(&self) -> &'static str {
        match self.binding {
            Binding::Eager => "reflected_eager",
            Binding::Lazy => "reflected_lazy",
        }
    }

    fn apply(&self, cx: HandlerContext<'_, W>) -> Result<PropagationResult, PropagationError> {
        let Some(owner) = (self.owner)(cx.world) else {
            return Ok(PropagationResult::NotApplicable);
        };
        let mut field = field_mut::<AssetSlot<T>>(owner, self.field)
            .map_err(|source| PropagationError::shape(cx.key, source))?;
        let slot = bind_slot::<T>(self.binding, cx.content, cx.key)?;
        field.set(slot);
        Ok(PropagationResult::Applied)
    }
}

pub struct FnHandler<W> {
    label: &'static str,
    apply: HandlerFn<W>,
}

impl<W> FnHandler<W> {
    pub fn new(label: &'static str, apply: HandlerFn<W>) -> Self {
        Self { label, apply }
    }
}

impl<W> AssetHandler<W> for FnHandler<W> {
    fn label(&self) -> &'static str {
        self.label
    }

    fn apply(&self, cx: HandlerContext<'_, W>) -> Result<PropagationResult, PropagationError> {
        (self.apply)(cx)
    }
}
