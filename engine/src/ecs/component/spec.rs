use crate::ecs::{
    component::{Component, Id, Registry},
    error::Result,
};

/// A compile-time list of component types: a single component, `()`, or a (possibly nested)
/// tuple of specs.
///
/// Used to declare several system requirements in one call, e.g.
/// `add_component_requirements::<(Position, Velocity)>("movement")`.
pub trait Spec: 'static {
    /// Resolve every type in this spec to its component id, registering types seen for the first
    /// time, and append the ids to `ids` in declaration order.
    fn resolve(registry: &mut Registry, ids: &mut Vec<Id>) -> Result<()>;

    /// Convenience wrapper around [`resolve`](Self::resolve) collecting into a new `Vec`.
    fn ids(registry: &mut Registry) -> Result<Vec<Id>> {
        let mut ids = Vec::new();
        Self::resolve(registry, &mut ids)?;
        Ok(ids)
    }
}

/// [`Spec`] implementation for single component types.
impl<C: Component> Spec for C {
    fn resolve(registry: &mut Registry, ids: &mut Vec<Id>) -> Result<()> {
        ids.push(registry.get_or_register::<C>()?);
        Ok(())
    }
}

/// [`Spec`] implementation for the empty tuple.
impl Spec for () {
    fn resolve(_registry: &mut Registry, _ids: &mut Vec<Id>) -> Result<()> {
        Ok(())
    }
}

/// Implement Spec for one tuple arity.
macro_rules! tuple_spec {
    ($($name: ident),*) => {
        impl<$($name: Spec),*> Spec for ($($name,)*) {
            fn resolve(registry: &mut Registry, ids: &mut Vec<Id>) -> Result<()> {
                $(<$name as Spec>::resolve(registry, ids)?;)*
                Ok(())
            }
        }
    };
}

/// Implement Spec for every tuple arity from the full list down to one element.
macro_rules! tuple_specs {
    ($head: ident) => {
        tuple_spec!($head);
    };
    ($head: ident, $($tail: ident),*) => {
        tuple_spec!($head, $($tail),*);
        tuple_specs!($($tail),*);
    };
}

tuple_specs!(A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P);
