use automata_engine::{parse_pattern, Pattern};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{Attribute, Ident, LitStr, Token, Visibility};

#[cfg(feature = "dot")]
use std::fs::File;
#[cfg(feature = "dot")]
use syn::{Expr, ExprLit, Lit, Meta, MetaNameValue};

/// Parses the pattern in `lit`, turning a syntax error into a compile error on the literal.
fn parse_literal(lit: &LitStr) -> syn::Result<Pattern> {
    parse_pattern(lit.value())
        .map_err(|err| syn::Error::new_spanned(lit, format!("invalid pattern: {err}")))
}

pub(crate) struct CompilePatternInput {
    attrs: Vec<Attribute>,
    vis: Visibility,
    _type: Token![type],
    name: Ident,
    _equals: Token![=],
    source: LitStr,
    _semi: Option<Token![;]>,
}

impl Parse for CompilePatternInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        Ok(Self {
            attrs: input.call(Attribute::parse_outer)?,
            vis: input.parse()?,
            _type: input.parse()?,
            name: input.parse()?,
            _equals: input.parse()?,
            source: input.parse()?,
            _semi: input.parse()?,
        })
    }
}

impl CompilePatternInput {
    pub fn compile(self) -> TokenStream {
        let mut errors = vec![];
        #[cfg(feature = "dot")]
        let mut graph = None;

        for i in self.attrs {
            match i.meta {
                #[cfg(feature = "dot")]
                Meta::NameValue(MetaNameValue {
                    path,
                    value:
                        Expr::Lit(ExprLit {
                            lit: Lit::Str(s), ..
                        }),
                    ..
                }) if path.is_ident("graph") => {
                    graph = Some(s);
                }
                i => errors.push(syn::Error::new_spanned(i, "unexpected attribute")),
            }
        }

        let pattern = parse_literal(&self.source).unwrap_or_else(|err| {
            errors.push(err);
            Pattern::empty()
        });
        let compiled = pattern.compile();

        #[cfg(feature = "dot")]
        if let Some(path) = graph {
            let written = File::create(path.value()).and_then(|mut f| compiled.output_dot(&mut f));
            if let Err(e) = written {
                errors.push(syn::Error::new_spanned(
                    &path,
                    format!("failed while graphing at {}: {e}", path.value()),
                ));
            }
        }

        compiled.emit(&self.vis, &self.name, errors).into()
    }
}

pub(crate) struct PatternInput {
    source: LitStr,
}

impl Parse for PatternInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        Ok(Self {
            source: input.parse()?,
        })
    }
}

fn construct(pattern: &Pattern) -> TokenStream2 {
    match pattern {
        Pattern::Empty => quote!(::automata::Pattern::empty()),
        Pattern::Literal(c) => quote!(::automata::Pattern::literal(#c)),
        Pattern::Concatenate(l, r) => {
            let (l, r) = (construct(l), construct(r));
            quote!(::automata::Pattern::concatenate(#l, #r))
        }
        Pattern::Choose(l, r) => {
            let (l, r) = (construct(l), construct(r));
            quote!(::automata::Pattern::choose(#l, #r))
        }
        Pattern::Repeat(p) => {
            let p = construct(p);
            quote!(::automata::Pattern::repeat(#p))
        }
    }
}

impl PatternInput {
    pub fn expand(self) -> TokenStream {
        match parse_literal(&self.source) {
            Ok(pattern) => {
                let body = construct(&pattern);
                quote!({
                    let pattern: ::automata::Pattern<char> = #body;
                    pattern
                })
                .into()
            }
            Err(err) => err.to_compile_error().into(),
        }
    }
}
