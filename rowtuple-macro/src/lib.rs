extern crate proc_macro;

use {
    proc_macro::TokenStream, quote::ToTokens, rowtuple_codegen::Invocation,
    syn::parse_macro_input,
};

/// Implement `Fields`, and `Position<K>` for each position, on every tuple of arity `0..=N`.
///
/// Only usable from within the `rowtuple` crate: the expansion names its traits by `crate::`
/// paths, and the orphan rule forbids implementing them on tuples anywhere else.
#[proc_macro]
pub fn impl_tuples(input: TokenStream) -> TokenStream {
    let invocation = parse_macro_input!(input as Invocation);
    match invocation.to_impls() {
        Ok(impls) => impls.into_token_stream().into(),
        Err(error) => error.to_compile_error().into(),
    }
}
