//! 类型内省抽象接口
//!
//! 依赖图构建与容器解析只通过此接口获取类型信息

use infrastructure_common::{MethodDescriptor, TypeDescriptor, TypeName};

/// 类型内省 trait
pub trait TypeIntrospector: Send + Sync {
    /// 是否为已知类型
    fn is_known(&self, type_name: &TypeName) -> bool;

    /// 是否可以实例化（非抽象、非接口）
    fn is_instantiable(&self, type_name: &TypeName) -> bool;

    /// 是否为 final 类型
    fn is_final(&self, type_name: &TypeName) -> bool;

    /// 是否声明了构造函数
    fn has_constructor(&self, type_name: &TypeName) -> bool;

    /// 构造函数是否公开
    fn is_constructor_public(&self, type_name: &TypeName) -> bool;

    /// 构造函数签名: 按声明顺序的 (参数名, 参数类型)
    fn constructor_signature(&self, type_name: &TypeName) -> Vec<(String, Option<TypeName>)>;

    /// 可以被代理重写的方法（排除私有与 final 方法）
    fn overridable_methods(&self, type_name: &TypeName) -> Vec<MethodDescriptor>;

    /// `concrete` 是否实现或继承了 `abstract_type`
    fn implements_or_extends(&self, concrete: &TypeName, abstract_type: &TypeName) -> bool;

    /// 获取完整的类型描述
    fn descriptor(&self, type_name: &TypeName) -> Option<TypeDescriptor>;
}
