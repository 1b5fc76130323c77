//! Trait adapter generation

/// Declare a trait and implement it for [`Proxy<T>`](crate::Proxy) wherever
/// `T` implements it, timing every method.
///
/// The macro takes the trait definition itself, emits it unchanged, and
/// generates one forwarding method per trait method. Methods with a default
/// body are forwarded like the rest, so the proxy runs the target's override
/// (or the default on the target) and the call is timed. Each generated
/// method calls [`Proxy::invoke`](crate::Proxy::invoke) for `&self` or
/// [`Proxy::invoke_mut`](crate::Proxy::invoke_mut) for `&mut self`, with the
/// method name as the key suffix.
///
/// Items the adapter cannot forward (generic methods, `self`-by-value
/// receivers, `async fn`, associated types and consts) are a compile error.
/// Supertraits must be declared with `intercept!` as well.
///
/// # Example
///
/// ```rust
/// use proxy::{intercept, Proxy};
/// use registry::Registry;
///
/// intercept! {
///     pub trait Arithmetic {
///         fn add(&self, a: i64, b: i64) -> i64;
///         fn reset(&mut self);
///         fn double(&self, a: i64) -> i64 {
///             self.add(a, a)
///         }
///     }
/// }
///
/// struct Calculator;
///
/// impl Arithmetic for Calculator {
///     fn add(&self, a: i64, b: i64) -> i64 {
///         a + b
///     }
///     fn reset(&mut self) {}
/// }
///
/// let registry = Registry::shared();
/// let mut calc = Proxy::builder(Calculator).registry(registry.clone()).build();
///
/// assert_eq!(calc.add(5, 10), 15);
/// assert_eq!(calc.double(4), 8);
/// calc.reset();
///
/// assert_eq!(registry.sample_count("Calculator.add"), 1);
/// assert_eq!(registry.sample_count("Calculator.double"), 1);
/// assert_eq!(registry.sample_count("Calculator.reset"), 1);
/// ```
#[macro_export]
macro_rules! intercept {
    (
        $(#[$attr:meta])*
        $vis:vis trait $trait:ident $(: $super:ident $(+ $more:ident)*)? {
            $($body:tt)*
        }
    ) => {
        $(#[$attr])*
        $vis trait $trait $(: $super $(+ $more)*)? {
            $($body)*
        }

        impl<__Target: $trait> $trait for $crate::Proxy<__Target> {
            $crate::intercept!(@methods $($body)*);
        }
    };

    (@methods) => {};

    (@methods
        $(#[$meta:meta])*
        fn $name:ident(&self $(, $arg:ident: $ty:ty)* $(,)?) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::intercept!(@shared $name($($arg: $ty),*) $(-> $ret)?);
        $crate::intercept!(@methods $($rest)*);
    };

    (@methods
        $(#[$meta:meta])*
        fn $name:ident(&self $(, $arg:ident: $ty:ty)* $(,)?) $(-> $ret:ty)? $default:block
        $($rest:tt)*
    ) => {
        $crate::intercept!(@shared $name($($arg: $ty),*) $(-> $ret)?);
        $crate::intercept!(@methods $($rest)*);
    };

    (@methods
        $(#[$meta:meta])*
        fn $name:ident(&mut self $(, $arg:ident: $ty:ty)* $(,)?) $(-> $ret:ty)?;
        $($rest:tt)*
    ) => {
        $crate::intercept!(@exclusive $name($($arg: $ty),*) $(-> $ret)?);
        $crate::intercept!(@methods $($rest)*);
    };

    (@methods
        $(#[$meta:meta])*
        fn $name:ident(&mut self $(, $arg:ident: $ty:ty)* $(,)?) $(-> $ret:ty)? $default:block
        $($rest:tt)*
    ) => {
        $crate::intercept!(@exclusive $name($($arg: $ty),*) $(-> $ret)?);
        $crate::intercept!(@methods $($rest)*);
    };

    (@shared $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?) => {
        fn $name(&self $(, $arg: $ty)*) $(-> $ret)? {
            $crate::Proxy::invoke(self, stringify!($name), move |target| target.$name($($arg),*))
        }
    };

    (@exclusive $name:ident($($arg:ident: $ty:ty),*) $(-> $ret:ty)?) => {
        fn $name(&mut self $(, $arg: $ty)*) $(-> $ret)? {
            $crate::Proxy::invoke_mut(self, stringify!($name), move |target| target.$name($($arg),*))
        }
    };
}
