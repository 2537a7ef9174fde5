//! Runtime schema: endpoints and status-keyed response unions.
//!
//! # Design
//! An `Endpoint` ties a path and method to a request payload type and a
//! response schema. A response schema is an enum with one variant per
//! declared status code, generated by [`responses!`](crate::responses), plus
//! an `Undeclared` variant that keeps the body of any other status as raw
//! JSON. Unknown codes therefore resolve rather than fail.

use serde::Serialize;
use serde_json::Value;

use crate::http::HttpMethod;

/// A typed API endpoint.
pub trait Endpoint {
    const PATH: &'static str;
    const METHOD: HttpMethod;

    type Request: Serialize;
    type Response: ResponseBody;
}

/// Maps a decoded response body onto a typed value by status code.
pub trait ResponseBody: Sized {
    fn from_wire(code: u16, body: Value) -> Result<Self, serde_json::Error>;
}

impl ResponseBody for Value {
    fn from_wire(_code: u16, body: Value) -> Result<Self, serde_json::Error> {
        Ok(body)
    }
}

/// Declare a response schema keyed by status code.
///
/// ```
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// pub struct User { pub id: u64, pub name: String }
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// pub struct Problem { pub message: String }
///
/// nutsapi_client::responses! {
///     #[derive(Debug, PartialEq)]
///     pub enum GetUserResponse {
///         200 => Found(User),
///         404 => NotFound(Problem),
///     }
/// }
///
/// use nutsapi_client::ResponseBody;
/// let body = serde_json::json!({"message": "no such user"});
/// let parsed = GetUserResponse::from_wire(404, body).unwrap();
/// assert_eq!(parsed, GetUserResponse::NotFound(Problem { message: "no such user".into() }));
/// ```
#[macro_export]
macro_rules! responses {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($code:literal => $variant:ident($ty:ty)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $($variant($ty),)+
            /// A status code the schema does not declare; the body is kept
            /// as untyped JSON.
            Undeclared {
                code: u16,
                body: $crate::__private::Value,
            },
        }

        impl $crate::ResponseBody for $name {
            fn from_wire(
                code: u16,
                body: $crate::__private::Value,
            ) -> ::std::result::Result<Self, $crate::__private::Error> {
                match code {
                    $($code => $crate::__private::from_value::<$ty>(body).map($name::$variant),)+
                    _ => ::std::result::Result::Ok($name::Undeclared { code, body }),
                }
            }
        }
    };
}
