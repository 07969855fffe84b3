use syn::{
    parse::{Parse, ParseStream, Result},
    LitInt, Token,
};

use crate::{Invocation, Spanned};

impl Parse for Invocation {
    fn parse(input: ParseStream) -> Result<Self> {
        // impl_tuples!(<bound>) with an optional trailing comma
        let lit = input.parse::<LitInt>()?;
        let bound = lit.base10_parse::<usize>()?;
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }
        if !input.is_empty() {
            return Err(input.error("expected a single arity bound, e.g. `impl_tuples!(32)`"));
        }
        Ok(Invocation {
            bound: Spanned {
                inner: bound,
                span: lit.span(),
            },
        })
    }
}
