mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::quote;
use syn::parse_macro_input;

/// Derives the `ErrorKind` trait for the given struct.
///
/// The information of the error is given through the `error` attribute:
/// ```ignore
/// use calcplot_attrs::ErrorKind;
/// use calcplot_error::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(
///     message = format!("the `{}` function does not exist", self.name),
///     labels = ["this function"],
///     help = "check the spelling of the function name",
/// )]
/// pub struct UnknownFunction {
///     pub name: String,
/// }
/// ```
///
/// | Tag       | Description                                                                    |
/// | --------- | ------------------------------------------------------------------------------ |
/// | `message` | The one-line summary of the error. Also used as the plain-text rendering.      |
/// | `labels`  | An iterable of strings, one per span of the error. Empty strings draw no text. |
/// | `help`    | Optional text describing what the user can do to fix the error.                |
/// | `note`    | Optional additional context.                                                   |
///
/// Each tag accepts an expression. The struct's fields are reachable through `self`.
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    let name = &target.name;
    quote! {
        impl ErrorKind for #name {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            #target
        }
    }.into()
}
