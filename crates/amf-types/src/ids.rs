//! Newtype identifiers for the entities in the AMF data model.
//!
//! Every id is a cheap `Copy` wrapper around a `u32`/`u64`, following the
//! same convention for every entity kind so lookups never accidentally
//! compare an `SuId` against an `SiId`.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($name:ident, $repr:ty, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name($repr);

        impl $name {
            pub const fn new(id: $repr) -> Self {
                Self(id)
            }

            pub const fn get(self) -> $repr {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $repr {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

id_type!(NodeId, u32, "Cluster member identifier.");
id_type!(SgId, u32, "Service Group identifier.");
id_type!(SuId, u32, "Service Unit identifier.");
id_type!(SiId, u32, "Service Instance identifier.");
id_type!(CompId, u32, "Component identifier.");
id_type!(CsiId, u32, "Component Service Instance identifier.");
id_type!(CsTypeId, u32, "Component Service Type identifier.");

/// A handle value as defined in spec.md §6 "Handle encoding": the high 32
/// bits are a daemon-lifetime-monotonic client id, the low 32 bits are the
/// node id the client is local to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HandleValue {
    client_id: u32,
    node_id: u32,
}

impl HandleValue {
    pub const fn new(client_id: u32, node_id: u32) -> Self {
        Self { client_id, node_id }
    }

    pub const fn client_id(self) -> u32 {
        self.client_id
    }

    pub const fn node_id(self) -> u32 {
        self.node_id
    }

    /// `IMMSV_PACK_HANDLE`: pack into a single opaque 64-bit value.
    pub const fn pack(self) -> u64 {
        ((self.client_id as u64) << 32) | (self.node_id as u64)
    }

    /// `IMMSV_UNPACK_HANDLE`.
    pub const fn unpack(value: u64) -> Self {
        Self {
            client_id: (value >> 32) as u32,
            node_id: value as u32,
        }
    }
}

impl fmt::Display for HandleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle({:#x})", self.pack())
    }
}

/// A 32-bit Configuration Change Bundle identifier (spec.md §3 "CCB").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CcbId(u32);

impl CcbId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for CcbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ccb#{}", self.0)
    }
}

impl From<u32> for CcbId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_pack_roundtrip() {
        let h = HandleValue::new(0xDEAD_BEEF, 7);
        let packed = h.pack();
        assert_eq!(HandleValue::unpack(packed), h);
    }

    #[test]
    fn ids_are_distinct_types() {
        let su = SuId::new(1);
        let si = SiId::new(1);
        assert_eq!(su.get(), si.get());
        // Compile-time: `su == si` would not type-check, which is the point.
    }
}
