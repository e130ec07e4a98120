//! `#[component_methods]` 实现
//!
//! 为 impl 块中的公开方法生成方法描述与按名称分发的 `Component::invoke`

use crate::utils::{
    extract_generic_type, has_attribute, is_option_type, is_result_type, is_str_type,
    is_unit_type, is_visible, strip_attributes,
};
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};
use syn::{
    Expr, FnArg, Ident, ImplItem, ImplItemFn, ItemImpl, Pat, Result, ReturnType, Type,
};

/// 方法级辅助属性
const METHOD_ATTRIBUTES: &[&str] = &["sealed", "skip"];

/// 参数级辅助属性
const PARAMETER_ATTRIBUTES: &[&str] = &["default"];

/// 展开 `#[component_methods]`
pub fn component_methods_impl(args: TokenStream, input: TokenStream) -> TokenStream {
    if !args.is_empty() {
        return syn::Error::new(Span::call_site(), "component_methods 不接受参数")
            .to_compile_error()
            .into();
    }

    let item_impl = match syn::parse::<ItemImpl>(input) {
        Ok(item_impl) => item_impl,
        Err(e) => return e.to_compile_error().into(),
    };

    match expand(item_impl) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => e.to_compile_error().into(),
    }
}

/// 单个方法的生成结果
struct MethodTokens {
    dispatch: TokenStream2,
    descriptor: TokenStream2,
}

fn expand(mut item_impl: ItemImpl) -> Result<TokenStream2> {
    if let Some((_, path, _)) = &item_impl.trait_ {
        return Err(syn::Error::new_spanned(
            path,
            "component_methods 只能用于固有 impl 块",
        ));
    }

    let mut methods = Vec::new();
    for item in &mut item_impl.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };
        if is_visible(&method.vis) && !has_attribute(&method.attrs, "skip") {
            methods.push(method_tokens(method)?);
        }
        strip_attributes(&mut method.attrs, METHOD_ATTRIBUTES);
        for input in &mut method.sig.inputs {
            if let FnArg::Typed(pat_type) = input {
                strip_attributes(&mut pat_type.attrs, PARAMETER_ATTRIBUTES);
            }
        }
    }

    let self_ty = &item_impl.self_ty;
    let (impl_generics, _, where_clause) = item_impl.generics.split_for_impl();
    let dispatches = methods.iter().map(|m| &m.dispatch);
    let descriptors = methods.iter().map(|m| &m.descriptor);

    Ok(quote! {
        #item_impl

        impl #impl_generics ::infrastructure_common::Component for #self_ty #where_clause {
            fn type_name(&self) -> ::infrastructure_common::TypeName {
                ::infrastructure_common::TypeName::from(
                    <Self as ::infrastructure_common::Injectable>::TYPE_NAME,
                )
            }

            #[allow(unused_variables)]
            fn invoke(
                &self,
                __method: &str,
                __arguments: &mut ::infrastructure_common::Arguments,
            ) -> ::infrastructure_common::MethodResult {
                match __method {
                    #(#dispatches)*
                    _ => ::std::result::Result::Err(
                        ::infrastructure_common::InvocationError::undefined_method(
                            <Self as ::infrastructure_common::Injectable>::TYPE_NAME,
                            __method,
                        )
                        .into(),
                    ),
                }
            }

            fn methods() -> ::std::vec::Vec<::infrastructure_common::MethodDescriptor> {
                ::std::vec![#(#descriptors),*]
            }
        }
    })
}

/// 参数类型的提取方式
enum ParameterKind {
    /// 按值传递
    Value(Type),
    /// `&T`，`&str` 按 `String` 提取
    Shared(Type),
    /// `&mut T`，调用后写回参数列表
    Exclusive(Type),
}

impl ParameterKind {
    fn from_type(ty: &Type) -> Self {
        match ty {
            Type::Reference(reference) => {
                let inner = if is_str_type(&reference.elem) {
                    syn::parse_quote!(String)
                } else {
                    (*reference.elem).clone()
                };
                if reference.mutability.is_some() {
                    Self::Exclusive(inner)
                } else {
                    Self::Shared(inner)
                }
            }
            other => Self::Value(other.clone()),
        }
    }

    fn extracted_type(&self) -> &Type {
        match self {
            Self::Value(ty) | Self::Shared(ty) | Self::Exclusive(ty) => ty,
        }
    }
}

fn method_tokens(method: &ImplItemFn) -> Result<MethodTokens> {
    let sig = &method.sig;
    if sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(sig, "组件方法不能是 async 函数"));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "组件方法不能带泛型参数, 可以使用 #[skip] 跳过",
        ));
    }

    let method_ident = &sig.ident;
    let method_name = method_ident.to_string();
    let mut is_static = true;
    let mut extractions = Vec::new();
    let mut call_arguments = Vec::new();
    let mut write_backs = Vec::new();
    let mut parameters = Vec::new();

    for (position, input) in sig.inputs.iter().enumerate() {
        let pat_type = match input {
            FnArg::Receiver(receiver) => {
                if receiver.reference.is_none() || receiver.mutability.is_some() {
                    return Err(syn::Error::new_spanned(
                        receiver,
                        "组件方法只能使用 &self 接收者",
                    ));
                }
                is_static = false;
                continue;
            }
            FnArg::Typed(pat_type) => pat_type,
        };

        let index = position - usize::from(!is_static);
        let local = format_ident!("__arg_{}", index);
        let parameter_name = match &*pat_type.pat {
            Pat::Ident(pat_ident) => pat_ident.ident.to_string(),
            _ => format!("arg{}", index),
        };
        let kind = ParameterKind::from_type(&pat_type.ty);
        let extracted = kind.extracted_type();
        let type_label = quote!(#extracted).to_string().replace(' ', "");
        let default = parameter_default(&pat_type.attrs)?;

        let extraction = match &default {
            Some(default) => quote! {
                __arguments.value_or::<#extracted, _>(#method_name, #index, || #default)?
            },
            None => quote! {
                __arguments.required::<#extracted>(#method_name, #index)?
            },
        };

        let mut parameter = quote! {
            ::infrastructure_common::ParameterDescriptor::typed(#parameter_name, #type_label)
        };
        if let Some(default) = &default {
            parameter = quote! {
                #parameter.with_default(::infrastructure_common::Value::new::<#extracted>(#default))
            };
        }

        match kind {
            ParameterKind::Value(_) => {
                extractions.push(quote! { let #local = #extraction; });
                call_arguments.push(quote! { #local });
            }
            ParameterKind::Shared(_) => {
                extractions.push(quote! { let #local = #extraction; });
                call_arguments.push(quote! { &#local });
            }
            ParameterKind::Exclusive(_) => {
                extractions.push(quote! { let mut #local = #extraction; });
                call_arguments.push(quote! { &mut #local });
                write_backs.push(quote! {
                    __arguments.set(#index, ::infrastructure_common::Value::new(#local));
                });
                parameter = quote! { #parameter.by_reference() };
            }
        }
        parameters.push(parameter);
    }

    let call = if is_static {
        quote! { Self::#method_ident(#(#call_arguments),*) }
    } else {
        quote! { self.#method_ident(#(#call_arguments),*) }
    };

    let (conversion, returns_reference) = return_conversion(&sig.output);

    let dispatch = quote! {
        #method_name => {
            #(#extractions)*
            let __result = #call;
            #(#write_backs)*
            #conversion
        }
    };

    let mut descriptor = quote! {
        ::infrastructure_common::MethodDescriptor::new(
            <Self as ::infrastructure_common::Injectable>::TYPE_NAME,
            #method_name,
        )
    };
    if has_attribute(&method.attrs, "sealed") {
        descriptor = quote! { #descriptor.sealed() };
    }
    if is_static {
        descriptor = quote! { #descriptor.static_method() };
    }
    if returns_reference {
        descriptor = quote! { #descriptor.returning_reference() };
    }
    for parameter in parameters {
        descriptor = quote! { #descriptor.with_parameter(#parameter) };
    }

    Ok(MethodTokens {
        dispatch,
        descriptor,
    })
}

/// `#[default(表达式)]`
fn parameter_default(attrs: &[syn::Attribute]) -> Result<Option<Expr>> {
    attrs
        .iter()
        .find(|attr| attr.path().is_ident("default"))
        .map(|attr| attr.parse_args::<Expr>())
        .transpose()
}

/// 将 `__result` 转换为 `MethodResult`，同时返回是否返回引用
fn return_conversion(output: &ReturnType) -> (TokenStream2, bool) {
    let ty = match output {
        ReturnType::Default => return (quote! { let () = __result; ::std::result::Result::Ok(None) }, false),
        ReturnType::Type(_, ty) => ty.as_ref(),
    };

    if is_result_type(ty) {
        let ok_value = format_ident!("__value");
        let (inner, returns_reference) = match extract_generic_type(ty) {
            Some(inner) => value_conversion(inner, &ok_value),
            None => (quote! { ::std::option::Option::Some(::infrastructure_common::Value::new(#ok_value)) }, false),
        };
        let tokens = quote! {
            match __result {
                ::std::result::Result::Ok(#ok_value) => ::std::result::Result::Ok(#inner),
                ::std::result::Result::Err(__error) => ::std::result::Result::Err(__error.into()),
            }
        };
        return (tokens, returns_reference);
    }

    let value = format_ident!("__result");
    let (inner, returns_reference) = value_conversion(ty, &value);
    (quote! { ::std::result::Result::Ok(#inner) }, returns_reference)
}

/// 将类型为 `ty` 的变量转换为 `Option<Value>`
fn value_conversion(ty: &Type, value: &Ident) -> (TokenStream2, bool) {
    if is_unit_type(ty) {
        return (quote! { { let () = #value; ::std::option::Option::None } }, false);
    }
    if is_option_type(ty) {
        return (
            quote! { #value.map(::infrastructure_common::Value::new) },
            false,
        );
    }
    if let Type::Reference(_) = ty {
        return (
            quote! {
                ::std::option::Option::Some(::infrastructure_common::Value::new(
                    ::std::borrow::ToOwned::to_owned(#value),
                ))
            },
            true,
        );
    }
    (
        quote! { ::std::option::Option::Some(::infrastructure_common::Value::new(#value)) },
        false,
    )
}
