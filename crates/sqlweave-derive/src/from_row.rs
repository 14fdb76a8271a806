//! FromRow derive macro implementation

use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Result};

#[derive(Default)]
struct FieldAttrs {
    column: Option<String>,
    skip: bool,
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "FromRow can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "FromRow can only be derived for structs",
            ));
        }
    };

    let mut field_extracts = Vec::with_capacity(fields.len());
    let mut schema_fields = Vec::with_capacity(fields.len());

    for field in fields {
        let field_ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let attrs = parse_field_attrs(field)?;

        if attrs.skip {
            field_extracts.push(quote! {
                #field_ident: ::core::default::Default::default()
            });
            continue;
        }

        let field_name = field_ident.to_string();
        let field_name = field_name.trim_start_matches("r#");
        let column_name = attrs
            .column
            .clone()
            .unwrap_or_else(|| field_name.to_snake_case());

        field_extracts.push(quote! {
            #field_ident: row.try_get(#column_name)?
        });
        schema_fields.push(match &attrs.column {
            Some(column) => quote! { ::sqlweave::Field::with_column(#field_name, #column) },
            None => quote! { ::sqlweave::Field::new(#field_name) },
        });
    }

    Ok(quote! {
        impl #impl_generics ::sqlweave::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &::sqlweave::Row) -> ::sqlweave::SqlResult<Self> {
                Ok(Self {
                    #(#field_extracts),*
                })
            }

            fn schema() -> ::sqlweave::Schema {
                ::sqlweave::Schema::new(::std::vec![
                    #(#schema_fields),*
                ])
            }
        }
    })
}

fn parse_field_attrs(field: &syn::Field) -> Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let lit: LitStr = meta.value()?.parse()?;
                let column = lit.value();
                if column.trim().is_empty() {
                    return Err(meta.error("column name must not be empty"));
                }
                attrs.column = Some(column);
                Ok(())
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported orm attribute, expected `column` or `skip`"))
            }
        })?;
    }
    Ok(attrs)
}
