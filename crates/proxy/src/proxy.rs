//! The call-timing proxy

use crate::clock::{Clock, MonotonicClock};
use crate::timer::CallTimer;
use registry::{global_registry, MethodKey, Registry};
use std::borrow::Cow;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Transparent wrapper that times method calls on `T`.
///
/// Methods are timed when they go through [`Proxy::invoke`],
/// [`Proxy::invoke_mut`], or a trait impl generated by
/// [`intercept!`](crate::intercept). Each timed call records one sample under
/// `"{TypeName}.{method}"` and hands back exactly what the target returned.
///
/// Field access goes through `Deref`/`DerefMut` and is never timed, so
/// `proxy.counter` reads and writes the target's field directly. Inherent
/// methods of `T` reached through `Deref` are not timed either; route them
/// through `invoke` to measure them.
///
/// `Proxy` has no methods of its own, only associated functions called as
/// `Proxy::invoke(&proxy, ..)`, so `proxy.anything()` always reaches the
/// target or an intercepted trait.
///
/// The proxy holds no mutable profiling state. All samples live in the
/// registry, which is shared by every proxy pointing at it.
pub struct Proxy<T> {
    target: T,
    type_name: Cow<'static, str>,
    registry: Arc<Registry>,
    clock: Arc<dyn Clock>,
}

impl<T> Proxy<T> {
    /// Wrap `target`, recording into the global registry with a monotonic clock.
    pub fn new(target: T) -> Self {
        Self::builder(target).build()
    }

    /// Start configuring a proxy around `target`.
    pub fn builder(target: T) -> ProxyBuilder<T> {
        ProxyBuilder {
            target,
            type_name: None,
            registry: None,
            clock: None,
        }
    }

    /// Type name used in keys.
    pub fn type_name(this: &Self) -> &str {
        &this.type_name
    }

    /// Key that calls to `method` record under.
    pub fn key(this: &Self, method: &str) -> MethodKey {
        MethodKey::new(&this.type_name, method)
    }

    /// Registry this proxy records into.
    pub fn registry(this: &Self) -> &Arc<Registry> {
        &this.registry
    }

    /// Time a call that borrows the target immutably.
    ///
    /// The closure's return value, `Err` included, is returned unchanged and
    /// may borrow from the target.
    /// If it panics, the sample is still recorded and the panic continues.
    #[inline]
    pub fn invoke<'a, R>(this: &'a Self, method: &str, call: impl FnOnce(&'a T) -> R) -> R {
        let _timer = CallTimer::start(Self::key(this, method), &*this.clock, &this.registry);
        call(&this.target)
    }

    /// Time a call that borrows the target mutably.
    #[inline]
    pub fn invoke_mut<'a, R>(this: &'a mut Self, method: &str, call: impl FnOnce(&'a mut T) -> R) -> R {
        let _timer = CallTimer::start(Self::key(this, method), &*this.clock, &this.registry);
        call(&mut this.target)
    }

    /// Borrow the wrapped target.
    pub fn target(this: &Self) -> &T {
        &this.target
    }

    /// Mutably borrow the wrapped target.
    pub fn target_mut(this: &mut Self) -> &mut T {
        &mut this.target
    }

    /// Unwrap, returning the target.
    pub fn into_inner(this: Self) -> T {
        this.target
    }
}

/// Configures a [`Proxy`] before it is built.
///
/// ```rust
/// use proxy::{ManualClock, Proxy};
/// use registry::Registry;
/// use std::sync::Arc;
///
/// let registry = Registry::shared();
/// let proxy = Proxy::builder(vec![1, 2, 3])
///     .registry(registry.clone())
///     .clock(Arc::new(ManualClock::new()))
///     .type_name("Numbers")
///     .build();
///
/// assert_eq!(Proxy::invoke(&proxy, "len", |v| v.len()), 3);
/// assert_eq!(registry.series("Numbers.len"), vec![0.0]);
/// ```
pub struct ProxyBuilder<T> {
    target: T,
    type_name: Option<Cow<'static, str>>,
    registry: Option<Arc<Registry>>,
    clock: Option<Arc<dyn Clock>>,
}

impl<T> ProxyBuilder<T> {
    /// Record into `registry` instead of the global one.
    pub fn registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Time calls with `clock` instead of the monotonic system clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use `name` as the type part of every key.
    pub fn type_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.type_name = Some(name.into());
        self
    }

    pub fn build(self) -> Proxy<T> {
        Proxy {
            target: self.target,
            type_name: self
                .type_name
                .unwrap_or(Cow::Borrowed(short_type_name::<T>())),
            registry: self
                .registry
                .unwrap_or_else(|| Arc::clone(global_registry())),
            clock: self.clock.unwrap_or_else(|| Arc::new(MonotonicClock::new())),
        }
    }
}

impl<T> Deref for Proxy<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.target
    }
}

impl<T> DerefMut for Proxy<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.target
    }
}

impl<T: Clone> Clone for Proxy<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            type_name: self.type_name.clone(),
            registry: Arc::clone(&self.registry),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Proxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("type_name", &self.type_name)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl<T: Default> Default for Proxy<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Wrap `target` in a proxy recording into the global registry.
pub fn wrap<T>(target: T) -> Proxy<T> {
    Proxy::new(target)
}

/// Last path segment of `T`'s type name, without generic arguments.
///
/// `app::model::Calculator<u8>` becomes `Calculator`; references and other
/// non-path types are returned as the compiler spells them.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    shorten(std::any::type_name::<T>())
}

fn shorten(full: &'static str) -> &'static str {
    let base = match full.find('<') {
        Some(idx) => &full[..idx],
        None => full,
    };
    // Leave `&T`, `[T]`, `(A, B)`, `dyn Trait` and friends as they are.
    if base.is_empty() || !base.chars().all(|c| c.is_alphanumeric() || c == '_' || c == ':') {
        return full;
    }
    match base.rfind("::") {
        Some(idx) => &base[idx + 2..],
        None => base,
    }
}
