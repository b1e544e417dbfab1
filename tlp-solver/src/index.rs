// Typed indices for the arena-style representation of the network and model.
// Every lookup table is keyed by these rather than by entity names, so names are
// hashed exactly once, when the network is resolved.

macro_rules! index_type {
    ($struct:ident, $prefix:literal) => {
        #[doc = concat!("A dense, typed index: ", stringify!($struct))]
        #[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
        #[repr(transparent)]
        pub struct $struct(usize);

        impl $struct {
            /// The raw position
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $struct {
            fn from(value: usize) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $struct {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

index_type!(CenterId, "c");
index_type!(CommodityId, "k");
index_type!(RegionId, "r");
index_type!(ArcId, "a");
index_type!(VarId, "x");
index_type!(RowId, "row");

/// Iterate over `0..len` as typed indices
pub(crate) fn indices<I: From<usize>>(len: usize) -> impl Iterator<Item = I> {
    (0..len).map(I::from)
}
