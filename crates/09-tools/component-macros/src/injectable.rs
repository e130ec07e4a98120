//! `#[derive(Injectable)]` 实现
//!
//! 生成类型描述与构造工厂，替代运行时反射读取构造函数签名

use crate::utils::{extract_generic_type, is_arc_type, split_type_list};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, Result, Type};

/// 类型级参数
#[derive(Debug, Default)]
struct InjectableArgs {
    name: Option<String>,
    extends: Option<String>,
    implements: Vec<String>,
    sealed: bool,
    constructor: Option<String>,
}

impl InjectableArgs {
    fn from_input(input: &DeriveInput) -> Result<Self> {
        let mut args = Self::default();
        for attr in &input.attrs {
            if !attr.path().is_ident("injectable") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    args.name = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("extends") {
                    args.extends = Some(meta.value()?.parse::<LitStr>()?.value());
                } else if meta.path.is_ident("implements") {
                    let list = meta.value()?.parse::<LitStr>()?.value();
                    args.implements.extend(split_type_list(&list));
                } else if meta.path.is_ident("sealed") {
                    args.sealed = true;
                } else if meta.path.is_ident("constructor") {
                    let lit = meta.value()?.parse::<LitStr>()?;
                    match lit.value().as_str() {
                        "public" | "protected" | "private" => args.constructor = Some(lit.value()),
                        _ => {
                            return Err(syn::Error::new(
                                lit.span(),
                                "constructor 只能是 \"public\"、\"protected\" 或 \"private\"",
                            ))
                        }
                    }
                } else {
                    return Err(meta.error("未知的 injectable 参数"));
                }
                Ok(())
            })?;
        }
        Ok(args)
    }
}

/// 注入字段
enum FieldSource {
    /// 由容器解析，类型名称表达式
    Injected(TokenStream2),
    /// 使用 `Default::default()`
    Defaulted,
}

fn field_source(field: &Field) -> Result<FieldSource> {
    let Some(attr) = field.attrs.iter().find(|attr| attr.path().is_ident("inject")) else {
        return Ok(FieldSource::Defaulted);
    };

    if matches!(attr.meta, syn::Meta::Path(_)) {
        return inferred_type_name(&field.ty).map(FieldSource::Injected);
    }

    let name: LitStr = attr.parse_args()?;
    Ok(FieldSource::Injected(quote! { #name }))
}

/// `Arc<T>` 字段使用 `T` 的类型名称
fn inferred_type_name(ty: &Type) -> Result<TokenStream2> {
    match extract_generic_type(ty) {
        Some(inner) if is_arc_type(ty) => {
            Ok(quote! { <#inner as ::infrastructure_common::Injectable>::TYPE_NAME })
        }
        _ => Err(syn::Error::new_spanned(
            ty,
            "#[inject] 只能推断 Arc<T> 字段的类型, 其他字段请使用 #[inject(\"类型名称\")]",
        )),
    }
}

/// 展开 `#[derive(Injectable)]`
pub fn derive_injectable_impl(input: DeriveInput) -> TokenStream {
    match expand(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> Result<TokenStream2> {
    let struct_name = &input.ident;
    let args = InjectableArgs::from_input(input)?;
    let type_name = args.name.clone().unwrap_or_else(|| struct_name.to_string());

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            struct_name,
            "Injectable 只能用于结构体",
        ));
    };

    let mut parameters = Vec::new();
    let mut initializers = Vec::new();
    let mut position = 0_usize;

    let named = match &data.fields {
        Fields::Named(fields) => Some(&fields.named),
        Fields::Unit => None,
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Injectable 不支持元组结构体",
            ))
        }
    };

    for field in named.into_iter().flatten() {
        let Some(ident) = &field.ident else {
            continue;
        };
        let field_ty = &field.ty;
        match field_source(field)? {
            FieldSource::Injected(dependency) => {
                position += 1;
                let parameter_name = ident.to_string();
                parameters.push(quote! {
                    ::infrastructure_common::ParameterDescriptor::typed(#parameter_name, #dependency)
                });
                initializers.push(quote! {
                    #ident: <#field_ty as ::infrastructure_common::Inject>::inject(
                        __arguments.next().ok_or_else(|| {
                            ::infrastructure_common::DependencyError::missing_argument(#type_name, #position)
                        })?,
                    )?
                });
            }
            FieldSource::Defaulted => {
                initializers.push(quote! {
                    #ident: ::core::default::Default::default()
                });
            }
        }
    }

    let construct = match named {
        Some(_) => quote! { #struct_name { #(#initializers),* } },
        None => quote! { #struct_name },
    };

    let visibility = match args.constructor.as_deref() {
        Some("private") => Some(quote! { ::infrastructure_common::Visibility::Private }),
        Some("protected") => Some(quote! { ::infrastructure_common::Visibility::Protected }),
        Some(_) => Some(quote! { ::infrastructure_common::Visibility::Public }),
        None if !parameters.is_empty() => Some(quote! { ::infrastructure_common::Visibility::Public }),
        None => None,
    };
    let constructor = visibility.map(|visibility| {
        quote! {
            .with_constructor(::infrastructure_common::ConstructorDescriptor::new(
                #visibility,
                vec![#(#parameters),*],
            ))
        }
    });

    let sealed = args.sealed.then(|| quote! { .sealed() });
    let extends = args.extends.as_ref().map(|parent| quote! { .extends(#parent) });
    let implements = args.implements.iter().map(|interface| quote! { .implements(#interface) });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::infrastructure_common::Injectable for #struct_name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;

            fn descriptor() -> ::infrastructure_common::TypeDescriptor {
                ::infrastructure_common::TypeDescriptor::class(#type_name)
                    #sealed
                    #extends
                    #(#implements)*
                    #constructor
                    .with_methods(<Self as ::infrastructure_common::Component>::methods())
                    .with_factory(|__arguments: ::std::vec::Vec<::infrastructure_common::Instance>| {
                        #[allow(unused_mut, unused_variables)]
                        let mut __arguments = __arguments.into_iter();
                        let __instance = #construct;
                        ::std::result::Result::Ok(
                            ::std::sync::Arc::new(__instance) as ::infrastructure_common::Instance
                        )
                    })
            }
        }
    })
}
