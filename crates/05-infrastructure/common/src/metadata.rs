//! 元数据定义
//!
//! 提供类型、构造函数与方法的描述信息，替代运行时反射

use crate::component::Instance;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// 类型名称
///
/// 类或接口的全局唯一标识，按字符串结构比较
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    /// 创建新的类型名称
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// 获取字符串形式
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 获取简短的类型名称（不包含模块路径或命名空间）
    pub fn short_name(&self) -> &str {
        self.0
            .rsplit(|c: char| c == ':' || c == '\\')
            .next()
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&TypeName> for TypeName {
    fn from(name: &TypeName) -> Self {
        name.clone()
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TypeName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TypeName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// 可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// 类型种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// 类
    Class { is_abstract: bool, is_final: bool },
    /// 接口
    Interface,
}

/// 参数描述
#[derive(Debug, Clone)]
pub struct ParameterDescriptor {
    /// 参数名称
    pub name: String,
    /// 声明的类型，`None` 表示未声明类型
    pub type_name: Option<TypeName>,
    /// 是否按引用传递
    pub by_reference: bool,
    /// 是否可选
    pub optional: bool,
    /// 默认值
    pub default: Option<Value>,
}

impl ParameterDescriptor {
    /// 创建声明了类型的参数
    pub fn typed(name: impl Into<String>, type_name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            type_name: Some(type_name.into()),
            by_reference: false,
            optional: false,
            default: None,
        }
    }

    /// 创建未声明类型的参数
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            by_reference: false,
            optional: false,
            default: None,
        }
    }

    /// 标记为按引用传递
    pub fn by_reference(mut self) -> Self {
        self.by_reference = true;
        self
    }

    /// 标记为可选（无默认值）
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// 设置默认值，同时标记为可选
    pub fn with_default(mut self, value: Value) -> Self {
        self.optional = true;
        self.default = Some(value);
        self
    }
}

/// 构造函数描述
#[derive(Debug, Clone, Default)]
pub struct ConstructorDescriptor {
    /// 可见性
    pub visibility: Visibility,
    /// 按声明顺序排列的参数
    pub parameters: Vec<ParameterDescriptor>,
}

impl ConstructorDescriptor {
    /// 创建构造函数描述
    pub fn new(visibility: Visibility, parameters: Vec<ParameterDescriptor>) -> Self {
        Self {
            visibility,
            parameters,
        }
    }

    /// 创建公开构造函数
    pub fn public(parameters: Vec<ParameterDescriptor>) -> Self {
        Self::new(Visibility::Public, parameters)
    }

    /// 创建私有构造函数
    pub fn private() -> Self {
        Self::new(Visibility::Private, Vec::new())
    }

    /// 是否为 public
    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// 构造函数签名: (参数名, 参数类型)
    pub fn signature(&self) -> Vec<(String, Option<TypeName>)> {
        self.parameters
            .iter()
            .map(|p| (p.name.clone(), p.type_name.clone()))
            .collect()
    }
}

/// 方法描述
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    /// 声明该方法的类型
    pub declaring_type: TypeName,
    /// 方法名称
    pub name: String,
    /// 方法可见性
    pub visibility: Visibility,
    /// 是否为 final（不可重写）
    pub is_final: bool,
    /// 是否为静态方法
    pub is_static: bool,
    /// 是否按引用返回
    pub returns_reference: bool,
    /// 参数列表，按声明顺序
    pub parameters: Vec<ParameterDescriptor>,
}

impl MethodDescriptor {
    /// 创建公开、可重写的实例方法描述
    pub fn new(declaring_type: impl Into<TypeName>, name: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            name: name.into(),
            visibility: Visibility::Public,
            is_final: false,
            is_static: false,
            returns_reference: false,
            parameters: Vec::new(),
        }
    }

    /// 设置可见性
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// 标记为不可重写
    pub fn sealed(mut self) -> Self {
        self.is_final = true;
        self
    }

    /// 标记为静态方法
    pub fn static_method(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// 标记为返回引用
    pub fn returning_reference(mut self) -> Self {
        self.returns_reference = true;
        self
    }

    /// 追加参数
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// 是否可以被代理重写（非私有且非 final）
    pub fn is_overridable(&self) -> bool {
        self.visibility != Visibility::Private && !self.is_final
    }

    /// 必需参数数量（最后一个非可选参数的位置）
    pub fn required_parameter_count(&self) -> usize {
        self.parameters
            .iter()
            .rposition(|p| !p.optional)
            .map_or(0, |index| index + 1)
    }

    /// 拦截器缓存键: `声明类型::方法名`
    pub fn cache_key(&self) -> String {
        format!("{}::{}", self.declaring_type, self.name)
    }
}

/// 组件工厂函数类型
///
/// 接收按构造函数顺序解析好的依赖，返回构造完成的实例
pub type ComponentFactory = Arc<
    dyn Fn(Vec<Instance>) -> Result<Instance, Box<dyn std::error::Error + Send + Sync>>
        + Send
        + Sync,
>;

/// 类型描述
#[derive(Clone)]
pub struct TypeDescriptor {
    /// 类型名称
    pub name: TypeName,
    /// 类型种类
    pub kind: TypeKind,
    /// 直接父类
    pub parent: Option<TypeName>,
    /// 直接实现（或继承）的接口
    pub interfaces: Vec<TypeName>,
    /// `None` 表示未声明构造函数，使用默认构造
    pub constructor: Option<ConstructorDescriptor>,
    /// 本类型声明的方法
    pub methods: Vec<MethodDescriptor>,
    /// 构造工厂，抽象类型与接口没有工厂
    pub factory: Option<ComponentFactory>,
}

impl TypeDescriptor {
    fn with_kind(name: impl Into<TypeName>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            interfaces: Vec::new(),
            constructor: None,
            methods: Vec::new(),
            factory: None,
        }
    }

    /// 创建类描述
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self::with_kind(
            name,
            TypeKind::Class {
                is_abstract: false,
                is_final: false,
            },
        )
    }

    /// 创建抽象类描述
    pub fn abstract_class(name: impl Into<TypeName>) -> Self {
        Self::with_kind(
            name,
            TypeKind::Class {
                is_abstract: true,
                is_final: false,
            },
        )
    }

    /// 创建接口描述
    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self::with_kind(name, TypeKind::Interface)
    }

    /// 标记为 final，不可被代理
    pub fn sealed(mut self) -> Self {
        if let TypeKind::Class { is_final, .. } = &mut self.kind {
            *is_final = true;
        }
        self
    }

    /// 设置父类
    pub fn extends(mut self, parent: impl Into<TypeName>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// 添加实现的接口
    pub fn implements(mut self, interface: impl Into<TypeName>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// 设置构造函数
    pub fn with_constructor(mut self, constructor: ConstructorDescriptor) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// 添加方法
    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// 批量添加方法
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = MethodDescriptor>) -> Self {
        self.methods.extend(methods);
        self
    }

    /// 设置构造工厂
    pub fn with_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(Vec<Instance>) -> Result<Instance, Box<dyn std::error::Error + Send + Sync>>
            + Send
            + Sync
            + 'static,
    {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// 是否为接口
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// 是否为 final 类
    pub fn is_final(&self) -> bool {
        matches!(self.kind, TypeKind::Class { is_final: true, .. })
    }

    /// 是否可以实例化：非抽象的类且提供了构造工厂
    pub fn is_instantiable(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Class {
                is_abstract: false,
                ..
            }
        ) && self.factory.is_some()
    }

    /// 直接父类型（父类与接口）
    pub fn supertypes(&self) -> impl Iterator<Item = &TypeName> {
        self.parent.iter().chain(self.interfaces.iter())
    }

    /// 使用给定参数构造实例
    pub fn instantiate(&self, arguments: Vec<Instance>) -> crate::DependencyResult<Instance> {
        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| crate::DependencyError::unresolvable(self.name.clone()))?;
        factory(arguments).map_err(|source| crate::DependencyError::ComponentCreationFailed {
            type_name: self.name.clone(),
            source,
        })
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("parent", &self.parent)
            .field("interfaces", &self.interfaces)
            .field("constructor", &self.constructor)
            .field("methods", &self.methods)
            .field("factory", &self.factory.as_ref().map(|_| "<function>"))
            .finish()
    }
}
