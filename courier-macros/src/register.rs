//! The `#[register]` attribute.
//!
//! Re-emits the annotated impl block unchanged and submits a
//! `courier::Registration` for it through `inventory`.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Expr, GenericArgument, Ident, ItemImpl, Path, PathArguments, Token, Type,
    parse::{Parse, ParseStream},
    parse_macro_input, parse_quote,
};

/// Arguments for the `#[register]` macro.
pub(crate) struct RegisterArgs {
    /// Ordering key; lower values register first.
    pub order: Expr,
}

impl Parse for RegisterArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut order = None;

        while !input.is_empty() {
            let ident: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match ident.to_string().as_str() {
                "order" => {
                    if order.is_some() {
                        return Err(syn::Error::new(ident.span(), "duplicate `order` argument"));
                    }
                    order = Some(input.parse()?);
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown attribute: {}", other),
                    ));
                }
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(RegisterArgs {
            order: order.unwrap_or_else(|| parse_quote!(0)),
        })
    }
}

/// The capability an impl block provides.
enum Kind {
    Handler,
    Behavior,
    NotificationHandler,
}

impl Kind {
    fn from_trait(path: &Path) -> Option<Self> {
        let last = path.segments.last()?;
        match last.ident.to_string().as_str() {
            "RequestHandler" => Some(Kind::Handler),
            "PipelineBehavior" => Some(Kind::Behavior),
            "NotificationHandler" => Some(Kind::NotificationHandler),
            _ => None,
        }
    }

    fn method(&self) -> Ident {
        let name = match self {
            Kind::Handler => "register_handler_factory_mut",
            Kind::Behavior => "register_behavior_factory_mut",
            Kind::NotificationHandler => "register_notification_handler_factory_mut",
        };
        Ident::new(name, proc_macro2::Span::call_site())
    }
}

/// The message type argument of `Trait<Message>`.
fn message_type(path: &Path) -> Option<&Type> {
    let last = path.segments.last()?;
    match &last.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    }
}

pub fn register_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as RegisterArgs);
    let input = parse_macro_input!(item as ItemImpl);

    match expand(&args, &input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(args: &RegisterArgs, input: &ItemImpl) -> syn::Result<proc_macro2::TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "#[register] cannot be used on generic impls; register each instantiation explicitly",
        ));
    }

    let Some((_, trait_path, _)) = &input.trait_ else {
        return Err(syn::Error::new_spanned(
            &input.self_ty,
            "#[register] must be placed on a trait impl",
        ));
    };

    let kind = Kind::from_trait(trait_path).ok_or_else(|| {
        syn::Error::new_spanned(
            trait_path,
            "#[register] supports `RequestHandler`, `PipelineBehavior` and `NotificationHandler` impls",
        )
    })?;

    let message = message_type(trait_path).ok_or_else(|| {
        syn::Error::new_spanned(trait_path, "expected a message type argument, e.g. `RequestHandler<Ping>`")
    })?;

    let self_ty = &input.self_ty;
    let method = kind.method();
    let order = &args.order;

    Ok(quote! {
        #input

        const _: () = {
            fn __courier_register(builder: &mut ::courier::RegistryBuilder) {
                builder.#method::<#message, #self_ty, _>(
                    <#self_ty as ::core::default::Default>::default,
                );
            }

            ::courier::inventory::submit! {
                ::courier::Registration::new(
                    concat!(module_path!(), "::", stringify!(#self_ty)),
                    #order,
                    __courier_register,
                )
            }
        };
    })
}
