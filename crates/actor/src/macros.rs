/// Defines an actor state type together with a cloneable wrapper type
/// that owns the actor handle.
///
/// ```ignore
/// define_actor! {
///     /// Docs for the wrapper.
///     pub Counter => #[derive(Default)] struct CounterState {
///         value: u32,
///     }
/// }
/// ```
///
/// The wrapper gets a private `spawn(state, label)` constructor and a
/// private `handle()` accessor, so crates add their own public API on top
/// in `impl` blocks.
#[macro_export]
macro_rules! define_actor {
    {
        $(#[doc = $doc:expr])*
        $v:vis $wrapper_type:ident =>
        $(#[$state_attr:meta])*
        struct $state_type:ident {
            $($state_items:tt)*
        }
    } => {
        $(#[$state_attr])*
        struct $state_type {
            $($state_items)*
        }

        $(#[doc = $doc])*
        $v struct $wrapper_type {
            handle: $crate::Actor<$state_type>,
        }

        impl $wrapper_type {
            #[inline]
            fn spawn(state: $state_type, label: &str) -> Self {
                Self {
                    handle: $crate::Actor::spawn(state, label),
                }
            }

            #[inline]
            fn handle(&self) -> &$crate::Actor<$state_type> {
                &self.handle
            }
        }

        impl Clone for $wrapper_type {
            #[inline]
            fn clone(&self) -> Self {
                Self {
                    handle: self.handle.clone(),
                }
            }
        }
    };
}
