//! Compile-time embedding of zstd-compressed files.
//!
//! `include_zstd!("path/relative/to/manifest.md")` expands to a byte string
//! literal holding the compressed file. An optional second argument sets the
//! compression level (default 19).

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use std::env;
use std::fs;
use std::path::PathBuf;
use syn::parse::{Parse, ParseStream};
use syn::{Error, LitByteStr, LitInt, LitStr, Token, parse_macro_input};

const DEFAULT_LEVEL: i32 = 19;

struct IncludeArgs {
    path: LitStr,
    level: Option<LitInt>,
}

impl Parse for IncludeArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let path: LitStr = input.parse()?;
        let level = if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
            if input.is_empty() {
                None
            } else {
                Some(input.parse()?)
            }
        } else {
            None
        };
        Ok(Self { path, level })
    }
}

#[proc_macro]
pub fn include_zstd(input: TokenStream) -> TokenStream {
    let args = parse_macro_input!(input as IncludeArgs);
    match expand(&args) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(args: &IncludeArgs) -> syn::Result<proc_macro2::TokenStream> {
    let level = match &args.level {
        Some(lit) => lit.base10_parse::<i32>()?,
        None => DEFAULT_LEVEL,
    };

    let manifest_dir = env::var("CARGO_MANIFEST_DIR")
        .map_err(|e| Error::new(Span::call_site(), e))?;
    let full_path = PathBuf::from(manifest_dir).join(args.path.value());

    let content = fs::read(&full_path).map_err(|e| {
        Error::new(
            args.path.span(),
            format!("cannot read {}: {e}", full_path.display()),
        )
    })?;
    let compressed = zstd::stream::encode_all(&content[..], level)
        .map_err(|e| Error::new(args.path.span(), e))?;

    let literal = LitByteStr::new(&compressed, Span::call_site());
    Ok(quote!(#literal))
}
