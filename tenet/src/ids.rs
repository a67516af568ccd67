use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Declares a `u32` newtype used as a dense identifier.
///
/// The type converts from and into `usize` so that it can directly index an [`IdVec`].
#[macro_export]
macro_rules! create_id_type {
    ($(#[$meta:meta])* $type_name:ident) => {
        $(#[$meta])*
        #[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Debug)]
        pub struct $type_name(u32);

        impl $type_name {
            pub const fn from_u32(u: u32) -> Self {
                $type_name(u)
            }

            pub const fn to_u32(self) -> u32 {
                self.0
            }
        }

        impl From<usize> for $type_name {
            fn from(u: usize) -> Self {
                debug_assert!(u <= u32::MAX as usize);
                Self::from_u32(u as u32)
            }
        }
        impl From<$type_name> for usize {
            fn from(v: $type_name) -> Self {
                v.0 as usize
            }
        }

        impl From<u32> for $type_name {
            fn from(u: u32) -> Self {
                Self::from_u32(u)
            }
        }
        impl From<$type_name> for u32 {
            fn from(v: $type_name) -> Self {
                v.0
            }
        }

        impl std::fmt::Display for $type_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

create_id_type!(
    /// Identifier of a node of the time-expanded network.
    NodeId
);
create_id_type!(
    /// Identifier of a hub, in `0..num_hubs`.
    HubId
);
create_id_type!(
    /// Identifier of a restricted route, i.e. its position in the list of restricted routes.
    RouteId
);

/// A discrete time step, valid steps of a network with horizon `T` are `0..=T`.
pub type Step = u32;

/// A vector indexed by a typed identifier.
#[derive(Clone, Debug)]
pub struct IdVec<K, V> {
    values: Vec<V>,
    phantom: PhantomData<K>,
}

impl<K, V> Default for IdVec<K, V> {
    fn default() -> Self {
        IdVec {
            values: Vec::new(),
            phantom: PhantomData,
        }
    }
}

impl<K, V> IdVec<K, V> {
    /// Creates a new vector with one `value` per key in `0..num_items`.
    pub fn with_values(num_items: usize, value: V) -> Self
    where
        V: Clone,
    {
        IdVec {
            values: vec![value; num_items],
            phantom: PhantomData,
        }
    }

    /// Appends `value` and returns its key.
    pub fn push(&mut self, value: V) -> K
    where
        K: From<usize>,
    {
        self.values.push(value);
        K::from(self.values.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, k: K) -> bool
    where
        usize: From<K>,
    {
        usize::from(k) < self.len()
    }

    pub fn get(&self, k: K) -> Option<&V>
    where
        usize: From<K>,
    {
        self.values.get(usize::from(k))
    }

    pub fn entries(&self) -> impl Iterator<Item = (K, &V)>
    where
        K: From<usize>,
    {
        self.values.iter().enumerate().map(|(i, v)| (K::from(i), v))
    }
}

impl<K: Into<usize>, V> Index<K> for IdVec<K, V> {
    type Output = V;

    fn index(&self, index: K) -> &Self::Output {
        &self.values[index.into()]
    }
}

impl<K: Into<usize>, V> IndexMut<K> for IdVec<K, V> {
    fn index_mut(&mut self, index: K) -> &mut Self::Output {
        &mut self.values[index.into()]
    }
}
