//! `define_port_error!`: error enums shared by every repository port.
//!
//! Each generated enum carries the two failure modes every store adapter
//! reports (`Connection`, `Query`) followed by the port's own variants. All
//! variants get a snake_case constructor taking `impl Into<_>` per field.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident for $store:literal {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident {
                    $($(#[$field_meta:meta])* $field:ident : $ty:ty),* $(,)?
                } => $message:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            #[doc = concat!("The ", $store, " could not be reached.")]
            #[error("{store} connection failed: {message}", store = $store)]
            Connection {
                /// Adapter-supplied detail.
                message: String,
            },
            #[doc = concat!("A ", $store, " statement failed or returned unusable rows.")]
            #[error("{store} query failed: {message}", store = $store)]
            Query {
                /// Adapter-supplied detail.
                message: String,
            },
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($(#[$field_meta])* $field : $ty),* },
            )*
        }

        impl $name {
            /// Construct [`Self::Connection`].
            #[must_use]
            pub fn connection(message: impl Into<String>) -> Self {
                Self::Connection { message: message.into() }
            }

            /// Construct [`Self::Query`].
            #[must_use]
            pub fn query(message: impl Into<String>) -> Self {
                Self::Query { message: message.into() }
            }

            /// Whether the store itself was unreachable, as opposed to a
            /// failed statement or a port-specific outcome.
            #[must_use]
            pub const fn is_unavailable(&self) -> bool {
                matches!(self, Self::Connection { .. })
            }

            $(
                ::paste::paste! {
                    #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
                    #[must_use]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;
