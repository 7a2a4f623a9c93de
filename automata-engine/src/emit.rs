use crate::{CompiledPattern, StateID};
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::Visibility;

impl CompiledPattern<char> {
    /// Convert this compiled pattern into rust code that matches strings against it.
    /// `name` is the name of the type that is emitted. Any `errors` are reported at the
    /// emission site, next to a matcher that is still well-formed.
    pub fn emit(&self, vis: &Visibility, name: &Ident, errors: Vec<syn::Error>) -> TokenStream {
        let initial = self.initial();
        let ids: Vec<_> = self.states().into_iter().collect();

        let arms: Vec<_> = ids
            .iter()
            .map(|state| {
                let (symbols, targets): (Vec<&char>, Vec<StateID>) =
                    self.transitions(*state).unzip();

                quote!(
                    match token {
                        #(
                            #symbols => {self.state = #targets;}
                        ),*
                        _ => {self.stuck = true;}
                    }
                )
            })
            .collect();

        let accepting: Vec<_> = ids.iter().map(|i| self.is_accepting(*i)).collect();
        let dead: Vec<_> = ids.iter().map(|i| self.is_dead(*i)).collect();
        let errors = errors.iter().map(syn::Error::to_compile_error);

        quote!(
            #(#errors)*

            #[derive(Debug, Clone)]
            #vis struct #name {
                state: usize,
                stuck: bool,
            }

            impl #name {
                #vis fn new() -> Self {
                    Self { state: #initial, stuck: false }
                }
            }

            impl ::automata::PatternMatcher for #name {
                type Alphabet = char;

                fn accept(&mut self, token: char) {
                    if self.stuck {
                        return;
                    }

                    match self.state {
                        #(
                            #ids => #arms
                        ),*
                        _ => unreachable!(),
                    }
                }

                fn is_accepting(&self) -> bool {
                    if self.stuck {
                        return false;
                    }

                    match self.state {
                        #(
                            #ids => #accepting,
                        )*
                        _ => unreachable!(),
                    }
                }

                fn is_stuck(&self) -> bool {
                    if self.stuck {
                        return true;
                    }

                    match self.state {
                        #(
                            #ids => #dead,
                        )*
                        _ => unreachable!(),
                    }
                }
            }
        )
    }
}
