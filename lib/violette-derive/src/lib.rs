extern crate proc_macro;

use darling::{ast, FromDeriveInput, FromField};
use quote::quote;
use syn::parse_macro_input;

#[derive(Debug, Clone, FromField)]
#[darling(attributes(attribute))]
struct Attribute {
    ident: Option<syn::Ident>,
    ty: syn::Type,
    #[darling(default)]
    ignore: bool,
    #[darling(default)]
    normalized: bool,
}

#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named))]
struct VertexInput {
    ident: syn::Ident,
    data: ast::Data<(), Attribute>,
}

/// Implement `violette::vertex::VertexAttributes` for a `#[repr(C)]` struct. One attribute
/// location is emitted per field, in declaration order.
///
/// Fields can be skipped with `#[attribute(ignore)]`, and integer fields can be read as
/// normalized floats with `#[attribute(normalized)]`. The struct must implement `Default`.
#[proc_macro_derive(VertexAttributes, attributes(attribute))]
pub fn derive_vertex_attributes(item: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(item as syn::DeriveInput);
    let input = match VertexInput::from_derive_input(&input) {
        Ok(input) => input,
        Err(err) => return err.write_errors().into(),
    };
    let ident = input.ident;
    let fields = match input.data.take_struct() {
        Some(fields) => fields.fields,
        None => unreachable!("darling only accepts named structs here"),
    };

    let descs = fields
        .iter()
        .filter(|attr| !attr.ignore)
        .filter_map(|attr| {
            let ty = &attr.ty;
            let field = attr.ident.as_ref()?;
            let desc = quote!(::violette::vertex::VertexDesc::from_gl_type::<#ty>(
                ::violette::bytemuck::offset_of!(#ident, #field)
            ));
            Some(if attr.normalized {
                quote!(#desc.normalized())
            } else {
                desc
            })
        })
        .collect::<Vec<_>>();

    quote!(
        impl ::violette::vertex::VertexAttributes for #ident {
            fn attributes() -> &'static [::violette::vertex::VertexDesc] {
                static ATTRIBUTES: ::violette::vertex::Lazy<Vec<::violette::vertex::VertexDesc>> =
                    ::violette::vertex::Lazy::new(|| vec![#(#descs),*]);
                ATTRIBUTES.as_slice()
            }
        }
    )
    .into()
}
