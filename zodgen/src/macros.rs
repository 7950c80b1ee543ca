/// Builds an argument list, converting each element with `Expr::from`.
///
/// ```
/// use zodgen::{Expr, args};
///
/// let args = args![3, "too short"];
/// assert_eq!(args, vec![Expr::from(3), Expr::string("too short")]);
/// assert!(args![].is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::<$crate::Expr>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$($crate::Expr::from($arg)),+]
    };
}
