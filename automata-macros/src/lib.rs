use crate::pattern::{CompilePatternInput, PatternInput};
use proc_macro::TokenStream;
use syn::parse_macro_input;

mod pattern;

#[proc_macro]
pub fn compile_pattern(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as CompilePatternInput);
    input.compile()
}

#[proc_macro]
pub fn pattern(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as PatternInput);
    input.expand()
}
