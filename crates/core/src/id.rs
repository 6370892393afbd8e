// SPDX-License-Identifier: MIT

//! Identifier newtypes shared across the engine.
//!
//! FlowForge mixes two identifier domains: opaque strings supplied by the
//! authoring tool (`internalBlockId`, `blockTypeId`) and positive integers
//! supplied by the owning system (`instanceId`, `templateId`,
//! `instanceUserId`). Both get the same newtype treatment so neither can be
//! silently swapped for a raw `String`/`u64` at a call site.

use crate::error::EngineError;

/// Define a newtype ID wrapper around `String`, validated non-blank at
/// construction.
///
/// Generates `new()` (fallible), `as_str()`, `Display`, `PartialEq<str>`,
/// `PartialEq<&str>`, and `Borrow<str>` implementations.
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub String);

        impl $name {
            /// Construct a validated id. Fails if `id` is blank.
            pub fn new(id: impl Into<String>) -> Result<Self, $crate::error::EngineError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err($crate::error::EngineError::NullArgument {
                        argument: stringify!($name),
                    });
                }
                Ok(Self(id))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Define a newtype ID wrapper around `u64`, validated positive at
/// construction.
///
/// Generalizes `define_id!` to FlowForge's numeric identifier domain
/// (`instanceId`, `templateId`, `instanceUserId` — all "positive integers"
/// per the construction contract).
#[macro_export]
macro_rules! define_positive_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        pub struct $name(u64);

        impl $name {
            /// Construct a validated id. Fails if `value` is zero.
            pub fn new(value: u64) -> Result<Self, $crate::error::EngineError> {
                if value == 0 {
                    return Err($crate::error::EngineError::NullArgument {
                        argument: stringify!($name),
                    });
                }
                Ok(Self(value))
            }

            pub fn get(&self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id! {
    /// Opaque string identifier for a block, unique within its owning
    /// instance.
    pub struct BlockId;
}

define_id! {
    /// String identifier selecting a block implementation from the
    /// registry.
    pub struct BlockTypeId;
}

define_positive_id! {
    /// Positive integer identifier for an instance, unique within a
    /// process.
    pub struct InstanceId;
}

define_positive_id! {
    /// Positive integer identifier of the template an instance was
    /// materialised from.
    pub struct TemplateId;
}

define_positive_id! {
    /// Positive integer identifier of the instance's owning user.
    pub struct UserId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
