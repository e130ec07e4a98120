//! 错误类型定义

use crate::metadata::TypeName;
use std::fmt;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 构造函数不可用的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorIssue {
    /// 构造函数不是公开的
    NotPublic,
    /// 构造函数参数无法解析为具体类型（位置从 1 开始）
    UnresolvableParameter { position: usize, name: String },
}

impl fmt::Display for ConstructorIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPublic => f.write_str("构造函数不是公开的，无法被解析"),
            Self::UnresolvableParameter { position, name } => write!(
                f,
                "构造函数第 {} 个参数 `{}` 的类型无法解析（例如未声明类型）",
                position, name
            ),
        }
    }
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("类型注册失败: {type_name} 未继承或实现 {target}")]
    Registration { type_name: TypeName, target: TypeName },

    #[error("参数无效: {message}")]
    InvalidArgument { message: String },

    #[error("类型 {type_name} 的构造函数无效: {issue}")]
    InvalidConstructor {
        type_name: TypeName,
        issue: ConstructorIssue,
    },

    #[error("检测到循环依赖: {dependent} 与 {dependency}")]
    CyclicDependency {
        dependent: TypeName,
        dependency: TypeName,
    },

    #[error("类型 {type_name} 未被映射且无法实例化")]
    Unresolvable { type_name: TypeName },

    #[error("类型 {type_name} 无法被代理: {message}")]
    Proxy { type_name: TypeName, message: String },

    #[error("解析 {type_name} 时超过最大深度 {max_depth}")]
    DepthExceeded { type_name: TypeName, max_depth: usize },

    #[error("类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: String, actual: TypeName },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: TypeName,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("容器状态序列化失败: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl DependencyError {
    /// 创建注册错误
    pub fn registration(type_name: impl Into<TypeName>, target: impl Into<TypeName>) -> Self {
        Self::Registration {
            type_name: type_name.into(),
            target: target.into(),
        }
    }

    /// 创建参数无效错误
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// 创建无法解析错误
    pub fn unresolvable(type_name: impl Into<TypeName>) -> Self {
        Self::Unresolvable {
            type_name: type_name.into(),
        }
    }

    /// 创建代理错误
    pub fn proxy(type_name: impl Into<TypeName>, message: impl Into<String>) -> Self {
        Self::Proxy {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// 工厂收到的构造参数少于声明的参数
    pub fn missing_argument(type_name: impl Into<TypeName>, position: usize) -> Self {
        let type_name = type_name.into();
        Self::ComponentCreationFailed {
            source: format!("缺少第 {} 个构造参数", position).into(),
            type_name,
        }
    }
}

/// 方法调用失败，拦截管道会原样重新抛出
pub type MethodFailure = Box<dyn std::error::Error + Send + Sync>;

/// 动态方法调用错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    #[error("类型 {type_name} 未定义方法 {method}")]
    UndefinedMethod { type_name: TypeName, method: String },

    #[error("方法 {method} 至少需要 {expected} 个参数, 实际传入 {actual} 个")]
    ArgumentCount {
        method: String,
        expected: usize,
        actual: usize,
    },

    #[error("方法 {method} 的第 {position} 个参数类型错误, 期望 {expected}")]
    ArgumentType {
        method: String,
        position: usize,
        expected: &'static str,
    },
}

impl InvocationError {
    /// 创建未定义方法错误
    pub fn undefined_method(type_name: impl Into<TypeName>, method: impl Into<String>) -> Self {
        Self::UndefinedMethod {
            type_name: type_name.into(),
            method: method.into(),
        }
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
/// 依赖注入结果类型
pub type DependencyResult<T> = Result<T, DependencyError>;
/// 方法调用结果，`None` 表示无返回值
pub type MethodResult = Result<Option<crate::value::Value>, MethodFailure>;
