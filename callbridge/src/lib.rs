pub mod core;

pub use crate::core::call::CallFuture;
pub use crate::core::channel::{serve, ChannelTransport};
pub use crate::core::config::BrokerConfig;
pub use crate::core::host::{handler_fn, Dispatcher, Handler, HandlersRegistry};
pub use crate::core::token::TokenStrategy;
pub use crate::core::wire::WireFormat;
pub use crate::core::Broker;
pub use callbridge_core::calls::*;
pub use callbridge_core::host::Host;
pub use callbridge_core::transport::Transport;

#[doc(hidden)]
pub mod __private {
    use crate::{CallError, CallFuture};
    use serde::Serialize;
    pub use serde_json::Value;

    pub fn to_value<V: Serialize + ?Sized>(v: &V) -> Result<Value, CallError> {
        serde_json::to_value(v).map_err(|e| CallError::InvalidArgument(e.to_string()))
    }

    pub fn rejected(error: CallError) -> CallFuture {
        CallFuture::rejected(error)
    }
}

/// Declares a typed front for a set of host functions. Each method
/// serializes its arguments and forwards to [`Broker::invoke`] under its own
/// name.
///
/// ```ignore
/// callbridge::remote_api! {
///     pub struct Api {
///         fn hello(name: &str);
///         fn add(a: i64, b: i64);
///     }
/// }
///
/// let api = Api::new(broker);
/// let greeting = api.hello("world").await?;
/// ```
#[macro_export]
macro_rules! remote_api {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fn_meta:meta])*
                fn $method:ident ( $( $arg:ident : $ty:ty ),* $(,)? );
            )*
        }
    ) => {
        $(#[$meta])*
        $vis struct $name<T> {
            broker: ::std::sync::Arc<$crate::Broker<T>>,
        }

        impl<T: $crate::Transport> $name<T> {
            $vis fn new(broker: ::std::sync::Arc<$crate::Broker<T>>) -> Self {
                Self { broker }
            }

            $vis fn broker(&self) -> &$crate::Broker<T> {
                &self.broker
            }

            $(
                $(#[$fn_meta])*
                $vis fn $method(&self, $( $arg: $ty ),*) -> $crate::CallFuture {
                    let args = (|| -> ::std::result::Result<
                        ::std::vec::Vec<$crate::__private::Value>,
                        $crate::CallError,
                    > {
                        ::std::result::Result::Ok(vec![$( $crate::__private::to_value(&$arg)? ),*])
                    })();

                    match args {
                        ::std::result::Result::Ok(args) => {
                            self.broker.invoke(stringify!($method), args)
                        }
                        ::std::result::Result::Err(err) => $crate::__private::rejected(err),
                    }
                }
            )*
        }
    };
}
