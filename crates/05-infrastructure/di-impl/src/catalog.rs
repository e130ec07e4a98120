//! 类型目录
//!
//! 默认的 [`TypeIntrospector`] 实现，类型信息来自显式注册或派生宏生成的描述

use di_abstractions::TypeIntrospector;
use infrastructure_common::{Injectable, MethodDescriptor, TypeDescriptor, TypeName};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// 类型目录
#[derive(Debug, Default)]
pub struct TypeCatalog {
    types: RwLock<HashMap<TypeName, TypeDescriptor>>,
}

impl TypeCatalog {
    /// 创建空类型目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册类型描述，同名类型会被覆盖
    pub fn register(&self, descriptor: TypeDescriptor) -> &Self {
        debug!("注册类型描述: {}", descriptor.name);
        self.types.write().insert(descriptor.name.clone(), descriptor);
        self
    }

    /// 注册可注入组件类型
    pub fn register_type<T: Injectable>(&self) -> &Self {
        self.register(T::descriptor())
    }

    /// 获取类型描述
    pub fn get(&self, type_name: &str) -> Option<TypeDescriptor> {
        self.types.read().get(type_name).cloned()
    }

    /// 是否已登记该类型
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.read().contains_key(type_name)
    }

    /// 已登记的类型数量
    pub fn len(&self) -> usize {
        self.types.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.types.read().is_empty()
    }

    /// 类型自身及其父类链上声明的全部方法，子类声明覆盖父类同名方法
    pub fn all_methods(&self, type_name: &str) -> Vec<MethodDescriptor> {
        let types = self.types.read();
        let mut seen = HashSet::new();
        let mut methods = Vec::new();
        let mut current = types.get(type_name);
        while let Some(descriptor) = current {
            if !seen.insert(descriptor.name.clone()) {
                break;
            }
            for method in &descriptor.methods {
                if !methods.iter().any(|m: &MethodDescriptor| m.name == method.name) {
                    methods.push(method.clone());
                }
            }
            current = descriptor
                .parent
                .as_ref()
                .and_then(|parent| types.get(parent.as_str()));
        }
        methods
    }

    /// 在类型自身及其父类链上查找方法
    pub fn find_method(&self, type_name: &str, method: &str) -> Option<MethodDescriptor> {
        self.all_methods(type_name)
            .into_iter()
            .find(|m| m.name == method)
    }
}

impl TypeIntrospector for TypeCatalog {
    fn is_known(&self, type_name: &TypeName) -> bool {
        self.contains(type_name.as_str())
    }

    fn is_instantiable(&self, type_name: &TypeName) -> bool {
        self.types
            .read()
            .get(type_name)
            .is_some_and(TypeDescriptor::is_instantiable)
    }

    fn is_final(&self, type_name: &TypeName) -> bool {
        self.types
            .read()
            .get(type_name)
            .is_some_and(TypeDescriptor::is_final)
    }

    fn has_constructor(&self, type_name: &TypeName) -> bool {
        self.types
            .read()
            .get(type_name)
            .is_some_and(|d| d.constructor.is_some())
    }

    fn is_constructor_public(&self, type_name: &TypeName) -> bool {
        self.types
            .read()
            .get(type_name)
            .and_then(|d| d.constructor.as_ref())
            .is_some_and(|c| c.is_public())
    }

    fn constructor_signature(&self, type_name: &TypeName) -> Vec<(String, Option<TypeName>)> {
        self.types
            .read()
            .get(type_name)
            .and_then(|d| d.constructor.as_ref())
            .map(|c| c.signature())
            .unwrap_or_default()
    }

    fn overridable_methods(&self, type_name: &TypeName) -> Vec<MethodDescriptor> {
        self.all_methods(type_name.as_str())
            .into_iter()
            .filter(MethodDescriptor::is_overridable)
            .collect()
    }

    fn implements_or_extends(&self, concrete: &TypeName, abstract_type: &TypeName) -> bool {
        if concrete == abstract_type {
            return true;
        }
        let types = self.types.read();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([concrete.clone()]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let Some(descriptor) = types.get(&current) else {
                continue;
            };
            for supertype in descriptor.supertypes() {
                if supertype == abstract_type {
                    return true;
                }
                queue.push_back(supertype.clone());
            }
        }
        false
    }

    fn descriptor(&self, type_name: &TypeName) -> Option<TypeDescriptor> {
        self.get(type_name.as_str())
    }
}
