/// Builds a [`Value`](crate::Value) from literal syntax.
///
/// Lists nest with `[...]`; any other token tree is converted with
/// `Value::from`, so integer literals become `Value::Integer` and string
/// literals become `Value::Text`. Negative literals must be parenthesized
/// inside a list, e.g. `value!([(-1), 2])`.
///
/// ```rust
/// use serde_backref::{value, Value};
///
/// let v = value!(["bar", 42, [1, (-2)]]);
/// assert_eq!(
///     v,
///     Value::List(vec![
///         Value::from("bar"),
///         Value::from(42),
///         Value::List(vec![Value::from(1), Value::from(-2)]),
///     ])
/// );
/// ```
#[macro_export]
macro_rules! value {
    // Handle empty list
    ([]) => {
        $crate::Value::List(vec![])
    };

    // Handle non-empty list
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::value!($elem)),*])
    };

    // Integers and strings
    ($e:expr) => {
        $crate::Value::from($e)
    };
}

/// Builds a `Vec<Value>` top-level sequence, one [`value!`] per element.
///
/// ```rust
/// use serde_backref::{encode, values};
///
/// let seq = values![1, 1, [2, "x"]];
/// assert_eq!(encode(&seq).unwrap(), "[1,<0>,[2;\"x\"]]");
/// ```
#[macro_export]
macro_rules! values {
    ($($elem:tt),* $(,)?) => {{
        let seq: ::std::vec::Vec<$crate::Value> = vec![$($crate::value!($elem)),*];
        seq
    }};
}
