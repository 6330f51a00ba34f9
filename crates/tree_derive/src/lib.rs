//! `#[derive(Walk)]` for the owned syntax tree in `gocanon-syntax`.
//!
//! The derive generates `crate::walk::Walk::walk_children`, which hands every
//! field (or every field of the active enum variant) to `Walk::walk`. Nodes the
//! visitor wants to intercept carry `#[walk(visit = visit_xxx)]`; for those the
//! derive also overrides `Walk::walk` to call `VisitorMut::visit_xxx(self)`.

use proc_macro::TokenStream;
use quote::{format_ident, quote, quote_spanned};
use syn::{
    parse_macro_input, parse_quote, spanned::Spanned, Data, DeriveInput, Fields, Ident, Index,
};

#[proc_macro_derive(Walk, attributes(walk))]
pub fn derive_walk(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let span = input.span();

    let visit = match visit_hook(&input) {
        Ok(hook) => hook,
        Err(err) => return err.into_compile_error().into(),
    };

    let children = match generate_children_body(&input.data) {
        Ok(body) => body,
        Err(err) => return err.into_compile_error().into(),
    };

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(crate::walk::Walk));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let walk_override = visit.map(|hook| {
        quote! {
            #[inline(always)]
            fn walk<V: crate::walk::VisitorMut + ?Sized>(&mut self, v: &mut V) {
                v.#hook(self);
            }
        }
    });

    let expanded = quote_spanned! {span =>
        impl #impl_generics crate::walk::Walk for #name #ty_generics #where_clause {
            #walk_override

            #[inline(always)]
            #[allow(unused_variables)]
            fn walk_children<V: crate::walk::VisitorMut + ?Sized>(&mut self, v: &mut V) {
                #children
            }
        }
    };

    expanded.into()
}

/// Reads `#[walk(visit = visit_xxx)]` from the item, if present.
fn visit_hook(input: &DeriveInput) -> syn::Result<Option<Ident>> {
    let mut hook = None;
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("walk")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("visit") {
                hook = Some(meta.value()?.parse::<Ident>()?);
                Ok(())
            } else {
                Err(meta.error("expected `visit = <visitor method>`"))
            }
        })?;
    }
    Ok(hook)
}

fn generate_children_body(data: &Data) -> syn::Result<proc_macro2::TokenStream> {
    match data {
        Data::Struct(data_struct) => Ok(generate_fields_walk(&data_struct.fields)),
        Data::Enum(data_enum) => {
            let arms = data_enum
                .variants
                .iter()
                .map(|variant| generate_variant_arm(&variant.ident, &variant.fields));

            Ok(quote! {
                match self {
                    #(#arms)*
                }
            })
        }
        Data::Union(u) => Err(syn::Error::new_spanned(
            u.union_token,
            "Walk cannot be derived for unions",
        )),
    }
}

fn generate_fields_walk(fields: &Fields) -> proc_macro2::TokenStream {
    let walk_calls = fields.iter().enumerate().map(|(i, field)| {
        let field_access = match &field.ident {
            Some(ident) => quote! { &mut self.#ident },
            None => {
                let index = Index::from(i);
                quote! { &mut self.#index }
            }
        };
        quote! { crate::walk::Walk::walk(#field_access, v); }
    });

    quote! { #(#walk_calls)* }
}

fn generate_variant_arm(variant_name: &Ident, fields: &Fields) -> proc_macro2::TokenStream {
    match fields {
        Fields::Unit => quote! { Self::#variant_name => {} },
        Fields::Named(fields_named) => {
            let bindings: Vec<_> = fields_named
                .named
                .iter()
                .filter_map(|f| f.ident.as_ref())
                .collect();

            quote! {
                Self::#variant_name { #(#bindings),* } => {
                    #(crate::walk::Walk::walk(#bindings, v);)*
                }
            }
        }
        Fields::Unnamed(fields_unnamed) => {
            let bindings: Vec<_> = (0..fields_unnamed.unnamed.len())
                .map(|i| format_ident!("f{}", i))
                .collect();

            quote! {
                Self::#variant_name(#(#bindings),*) => {
                    #(crate::walk::Walk::walk(#bindings, v);)*
                }
            }
        }
    }
}
