//! Helper macro for generating domain port error enums.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        impl $name {
            ::paste::paste! {
                $(
                    #[doc = concat!("Helper constructor for [`Self::", stringify!($variant), "`].")]
                    #[must_use]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        /// Example error for macro coverage.
        pub enum ExamplePortError {
            /// Connectivity failure.
            Connection { message: String } => "connection failed: {message}",
            /// Mixed-field failure.
            Refused { message: String, status: u16 } => "refused ({status}): {message}",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExamplePortError::connection("timed out");
        assert_eq!(err.to_string(), "connection failed: timed out");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExamplePortError::refused("no capacity", 503_u16);
        assert_eq!(err.to_string(), "refused (503): no capacity");
    }
}
