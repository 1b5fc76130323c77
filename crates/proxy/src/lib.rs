//! Interception Proxy
//!
//! Wraps an object so every method call is timed and recorded into the
//! measurement registry, while the caller sees exactly what the unwrapped
//! object would have produced:
//! - [`Proxy`] forwards field access untouched and times method calls
//! - [`intercept!`] declares a trait and its timed impl for `Proxy<T>`
//! - [`CallTimer`] records on drop, so panicking calls are timed too
//! - [`Clock`] is the time-source seam, with a [`ManualClock`] for tests
//!
//! # Example
//!
//! ```rust
//! use proxy::Proxy;
//! use registry::Registry;
//!
//! struct Calculator;
//!
//! impl Calculator {
//!     fn add(&self, a: i32, b: i32) -> i32 {
//!         a + b
//!     }
//! }
//!
//! let registry = Registry::shared();
//! let calc = Proxy::builder(Calculator).registry(registry.clone()).build();
//!
//! assert_eq!(Proxy::invoke(&calc, "add", |c| c.add(5, 10)), 15);
//! assert_eq!(registry.series("Calculator.add").len(), 1);
//! ```
//!
//! Proxies built with [`Proxy::new`] or [`wrap`] record into
//! [`registry::global_registry`].

mod clock;
mod intercept;
mod proxy;
mod timer;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use proxy::{short_type_name, wrap, Proxy, ProxyBuilder};
pub use timer::CallTimer;
