//! Helper macro for declaring adapter error enums at port boundaries.
//!
//! Each variant gets a `thiserror` message and a snake_case constructor whose
//! field parameters accept `impl Into<T>`, so adapters can write
//! `KeyValueStoreError::backend(err.to_string())` or pass a `&str` directly.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SamplePortError {
            Unreachable => "store unreachable",
            Backend { message: String } => "store backend failed: {message}",
            Status { status: u16, body: String } => "upstream status {status}: {body}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SamplePortError::unreachable().to_string(), "store unreachable");
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SamplePortError::backend("timeout");
        assert_eq!(err.to_string(), "store backend failed: timeout");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = SamplePortError::status(503_u16, "busy");
        assert_eq!(err.to_string(), "upstream status 503: busy");
    }
}
