//! Message derive macros.
//!
//! This module contains:
//! - `#[derive(Request)]` - implements `Request`, reading `#[request(response = T)]`
//! - `#[derive(Notification)]` - implements the `Notification` marker

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, DeriveInput, Type, parse_macro_input, parse_quote};

pub fn derive_request_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let response = match response_type(&input.attrs) {
        Ok(response) => response.unwrap_or_else(|| parse_quote!(())),
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl #impl_generics ::courier::Request for #name #ty_generics #where_clause {
            type Response = #response;
        }
    };

    TokenStream::from(expanded)
}

pub fn derive_notification_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::courier::Notification for #name #ty_generics #where_clause {}
    };

    TokenStream::from(expanded)
}

/// Read `response = T` out of the `#[request(...)]` attributes.
fn response_type(attrs: &[Attribute]) -> syn::Result<Option<Type>> {
    let mut response = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("request")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("response") {
                if response.is_some() {
                    return Err(meta.error("duplicate `response` argument"));
                }
                response = Some(meta.value()?.parse::<Type>()?);
                Ok(())
            } else {
                Err(meta.error("unknown request attribute, expected `response = Type`"))
            }
        })?;
    }

    Ok(response)
}
