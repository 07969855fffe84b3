//! The code generator behind `rowtuple`'s `impl_tuples!` macro.
//!
//! A Rust tuple of any arity can act as the storage of a typed row, but Rust has no variadic
//! generics, so each arity needs its own `Fields` implementation and one `Position<K>`
//! implementation per position `K`. Rather than writing those out by hand, the `rowtuple` crate
//! invokes `impl_tuples!(32)`, and this crate expands that single template over every arity from
//! `0` up to the bound.
//!
//! The expansion refers to the traits through `crate::...` paths, so it is only meaningful inside
//! the `rowtuple` crate itself.

use {
    proc_macro2::{Literal, Span, TokenStream},
    quote::{quote, ToTokens},
    std::fmt,
    syn::{Error, Ident, Index},
    thiserror::Error,
};

pub mod parse;

/// The largest arity that may be requested: the packed state word holds two bits for each field
/// in a single `u64`.
pub const MAX_ARITY: usize = 32;

/// A value paired with the span of the tokens it was parsed from.
#[derive(Debug, Clone, Copy)]
pub struct Spanned<T> {
    pub inner: T,
    pub span: Span,
}

impl<T> From<T> for Spanned<T> {
    fn from(inner: T) -> Self {
        Spanned {
            inner,
            span: Span::call_site(),
        }
    }
}

/// Errors detected while validating an `impl_tuples!` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("arity bound {0} exceeds the supported maximum of {}", MAX_ARITY)]
    ArityTooLarge(usize),
}

/// A parsed `impl_tuples!(N)` invocation: generate implementations for every arity in `0..=N`.
#[derive(Debug, Clone, Copy)]
pub struct Invocation {
    pub bound: Spanned<usize>,
}

impl Invocation {
    pub fn new(bound: usize) -> Self {
        Invocation {
            bound: bound.into(),
        }
    }

    /// Validate the bound and produce one [`TupleImpl`] per arity.
    pub fn to_impls(&self) -> Result<TupleImpls, Error> {
        let bound = self.bound.inner;
        if bound > MAX_ARITY {
            return Err(Error::new(
                self.bound.span,
                CompileError::ArityTooLarge(bound),
            ));
        }

        Ok(TupleImpls {
            impls: (0..=bound).map(|arity| TupleImpl { arity }).collect(),
        })
    }
}

/// The implementations for a contiguous run of arities.
#[derive(Debug, Clone)]
pub struct TupleImpls {
    pub impls: Vec<TupleImpl>,
}

impl ToTokens for TupleImpls {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        for tuple_impl in &self.impls {
            tuple_impl.to_tokens(tokens);
        }
    }
}

/// The `Fields` implementation for the tuple of one arity, plus one `Position<K>` implementation
/// for each of its positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TupleImpl {
    pub arity: usize,
}

impl TupleImpl {
    fn params(&self) -> Vec<Ident> {
        (0..self.arity)
            .map(|i| Ident::new(&format!("T{}", i), Span::call_site()))
            .collect()
    }

    fn fields_impl(&self, params: &[Ident], tuple: &TokenStream) -> TokenStream {
        let arity = Literal::usize_unsuffixed(self.arity);
        let positions: Vec<Literal> = (0..self.arity).map(Literal::usize_unsuffixed).collect();
        let indices: Vec<Index> = (0..self.arity).map(Index::from).collect();

        quote! {
            #[allow(unused_variables, unused_qualifications)]
            impl<#(#params: crate::FieldValue),*> crate::Fields for #tuple {
                const ARITY: usize = #arity;

                const FIELD_TYPES: &'static [crate::FieldType] =
                    &[#(<#params as crate::FieldValue>::FIELD_TYPE),*];

                fn default_fields() -> Self {
                    (#(<#params as ::core::default::Default>::default(),)*)
                }

                fn value(&self, index: usize) -> ::core::option::Option<crate::Value> {
                    match index {
                        #(#positions => ::core::option::Option::Some(
                            crate::FieldValue::into_value(
                                ::core::clone::Clone::clone(&self.#indices),
                            ),
                        ),)*
                        _ => ::core::option::Option::None,
                    }
                }

                fn set_value(
                    &mut self,
                    index: usize,
                    value: crate::Value,
                ) -> ::core::result::Result<(), crate::Value> {
                    match index {
                        #(#positions => {
                            self.#indices = <#params as crate::FieldValue>::from_value(value)?;
                            ::core::result::Result::Ok(())
                        })*
                        _ => ::core::result::Result::Err(value),
                    }
                }

                fn fields_eq(&self, other: &Self) -> bool {
                    true #(&& self.#indices == other.#indices)*
                }
            }
        }
    }

    fn position_impls(&self, params: &[Ident], tuple: &TokenStream) -> TokenStream {
        let mut tokens = TokenStream::new();
        for (k, param) in params.iter().enumerate() {
            let position = Literal::usize_unsuffixed(k);
            let index = Index::from(k);
            tokens.extend(quote! {
                #[allow(unused_qualifications)]
                impl<#(#params: crate::FieldValue),*> crate::Position<#position> for #tuple {
                    type Field = #param;

                    fn field(&self) -> &#param {
                        &self.#index
                    }

                    fn field_mut(&mut self) -> &mut #param {
                        &mut self.#index
                    }
                }
            });
        }
        tokens
    }
}

impl ToTokens for TupleImpl {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let params = self.params();
        let tuple = quote!((#(#params,)*));
        tokens.extend(self.fields_impl(&params, &tuple));
        tokens.extend(self.position_impls(&params, &tuple));
    }
}

impl fmt::Display for TupleImpl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(")?;
        for i in 0..self.arity {
            write!(f, "T{}", i)?;
            if i + 1 < self.arity {
                write!(f, ", ")?;
            }
        }
        if self.arity == 1 {
            write!(f, ",")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(tuple_impl: TupleImpl) -> Vec<syn::Item> {
        syn::parse2::<syn::File>(tuple_impl.to_token_stream())
            .unwrap()
            .items
    }

    #[test]
    fn unit_tuple_has_no_positions() {
        let items = items(TupleImpl { arity: 0 });
        assert_eq!(items.len(), 1);
        let s = items[0].to_token_stream().to_string();
        assert!(s.contains("const ARITY : usize = 0"), "{}", s);
        assert!(s.contains("for ()"), "{}", s);
    }

    #[test]
    fn three_tuple_has_three_positions() {
        let items = items(TupleImpl { arity: 3 });
        assert_eq!(items.len(), 4);
        let last = items[3].to_token_stream().to_string();
        assert!(last.contains("crate :: Position < 2 >"), "{}", last);
        assert!(last.contains("type Field = T2"), "{}", last);
        assert!(last.contains("& self . 2"), "{}", last);
    }

    #[test]
    fn singleton_tuple_keeps_trailing_comma() {
        let s = TupleImpl { arity: 1 }.to_token_stream().to_string();
        assert!(s.contains("for (T0 ,)"), "{}", s);
        assert_eq!(TupleImpl { arity: 1 }.to_string(), "(T0,)");
    }

    #[test]
    fn display_lists_parameters() {
        assert_eq!(TupleImpl { arity: 0 }.to_string(), "()");
        assert_eq!(TupleImpl { arity: 3 }.to_string(), "(T0, T1, T2)");
    }

    #[test]
    fn invocation_covers_every_arity_up_to_bound() {
        let impls = Invocation::new(4).to_impls().unwrap();
        let arities: Vec<usize> = impls.impls.iter().map(|i| i.arity).collect();
        assert_eq!(arities, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn maximum_bound_is_accepted() {
        let impls = Invocation::new(MAX_ARITY).to_impls().unwrap();
        assert_eq!(impls.impls.len(), MAX_ARITY + 1);
    }

    #[test]
    fn bound_past_maximum_is_rejected() {
        let err = Invocation::new(MAX_ARITY + 1).to_impls().unwrap_err();
        assert_eq!(
            err.to_string(),
            CompileError::ArityTooLarge(MAX_ARITY + 1).to_string()
        );
    }
}
