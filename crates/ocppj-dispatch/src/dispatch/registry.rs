//! Validator registry: action name -> validator, plus the hook slots.
//!
//! Validators and hooks share one reader/writer lock. Registration and hook
//! installation take the write lock; dispatch takes a read-lock snapshot and
//! releases it before running any user code, so a hook may reinstall hooks
//! without deadlocking.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use ocppj_core::error::{OcppError, Result};

use super::hooks::{PostHook, PreHook};
use super::validator::{Request, RequestValidator, Validator};

/// Everything dispatch needs for one action, cloned out of the lock.
pub(crate) struct Route {
    pub validator: Option<Arc<dyn Validator>>,
    pub pre: Option<PreHook>,
    pub post: Option<PostHook>,
}

#[derive(Default)]
struct Inner {
    validators: HashMap<String, Arc<dyn Validator>>,
    pre: Option<PreHook>,
    post: Option<PostHook>,
    frozen: bool,
}

/// Construct once at startup, then share via `Arc`.
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator. Fails if the action is already registered or the
    /// registry is frozen; use [`Registry::replace`] to overwrite on purpose.
    pub fn register(&self, action: impl Into<String>, validator: Arc<dyn Validator>) -> Result<()> {
        let action = action.into();
        let mut g = self.inner.write();
        if g.frozen {
            return Err(OcppError::RegistryFrozen);
        }
        if g.validators.contains_key(&action) {
            return Err(OcppError::DuplicateAction(action));
        }
        tracing::debug!(%action, "validator registered");
        g.validators.insert(action, validator);
        Ok(())
    }

    /// Register the generic validator of a [`Request`] type under its action.
    pub fn register_request<T: Request>(&self) -> Result<()> {
        self.register(T::ACTION, Arc::new(RequestValidator::<T>::new()))
    }

    /// Insert or overwrite. Returns the validator previously registered.
    pub fn replace(
        &self,
        action: impl Into<String>,
        validator: Arc<dyn Validator>,
    ) -> Result<Option<Arc<dyn Validator>>> {
        let action = action.into();
        let mut g = self.inner.write();
        if g.frozen {
            return Err(OcppError::RegistryFrozen);
        }
        let prev = g.validators.insert(action.clone(), validator);
        if prev.is_some() {
            tracing::info!(%action, "validator replaced");
        } else {
            tracing::debug!(%action, "validator registered");
        }
        Ok(prev)
    }

    pub fn lookup(&self, action: &str) -> Option<Arc<dyn Validator>> {
        self.inner.read().validators.get(action).cloned()
    }

    pub fn contains(&self, action: &str) -> bool {
        self.inner.read().validators.contains_key(action)
    }

    /// Registered action names, sorted.
    pub fn actions(&self) -> Vec<String> {
        let mut out: Vec<String> = self.inner.read().validators.keys().cloned().collect();
        out.sort();
        out
    }

    pub fn len(&self) -> usize {
        self.inner.read().validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().validators.is_empty()
    }

    /// Reject further `register`/`replace` calls. Hooks stay settable.
    pub fn freeze(&self) {
        let mut g = self.inner.write();
        if !g.frozen {
            g.frozen = true;
            tracing::info!(actions = g.validators.len(), "registry frozen");
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.inner.read().frozen
    }

    /// Install (`Some`) or clear (`None`) the pre-validation hook.
    pub fn set_pre_hook(&self, hook: Option<PreHook>) {
        self.inner.write().pre = hook;
    }

    /// Install (`Some`) or clear (`None`) the post-validation hook.
    pub fn set_post_hook(&self, hook: Option<PostHook>) {
        self.inner.write().post = hook;
    }

    pub(crate) fn route(&self, action: &str) -> Route {
        let g = self.inner.read();
        Route {
            validator: g.validators.get(action).cloned(),
            pre: g.pre.clone(),
            post: g.post.clone(),
        }
    }
}
