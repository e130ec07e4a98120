//! 依赖图构建器

use di_abstractions::{DependencyGraph, TypeIntrospector};
use infrastructure_common::{ConstructorIssue, DependencyError, DependencyResult, TypeName};
use tracing::{debug, trace};

/// 依赖图构建器
///
/// 深度优先地为类型及其全部构造依赖建立依赖图条目。
/// 依赖落在当前构建路径上即为循环依赖，报错的边由路径上最后一个类型指向该依赖
pub struct DependencyGraphBuilder<'a> {
    introspector: &'a dyn TypeIntrospector,
    max_depth: usize,
}

impl<'a> DependencyGraphBuilder<'a> {
    /// 创建构建器，`max_depth` 限制递归深度
    pub fn new(introspector: &'a dyn TypeIntrospector, max_depth: usize) -> Self {
        Self {
            introspector,
            max_depth,
        }
    }

    /// 为类型构建依赖图，已存在的条目不会重新计算
    ///
    /// 条目在其全部依赖构建完成后才写入，失败时路径上的类型都不会留下条目，
    /// 此前已完成的兄弟子图保留
    pub fn build(&self, graph: &mut DependencyGraph, type_name: &TypeName) -> DependencyResult<()> {
        if graph.contains(type_name.as_str()) {
            return Ok(());
        }
        let mut path = Vec::new();
        self.build_at(graph, &mut path, type_name)
    }

    fn build_at(
        &self,
        graph: &mut DependencyGraph,
        path: &mut Vec<TypeName>,
        type_name: &TypeName,
    ) -> DependencyResult<()> {
        if path.len() > self.max_depth {
            return Err(DependencyError::DepthExceeded {
                type_name: type_name.clone(),
                max_depth: self.max_depth,
            });
        }

        let dependencies = self.constructor_dependencies(type_name)?;
        trace!("依赖图条目: {} -> {:?}", type_name, dependencies);

        path.push(type_name.clone());
        let built = self.build_dependencies(graph, path, type_name, &dependencies);
        path.pop();
        built?;

        graph.insert(type_name.clone(), dependencies);
        debug!("依赖图构建完成: {}", type_name);
        Ok(())
    }

    fn build_dependencies(
        &self,
        graph: &mut DependencyGraph,
        path: &mut Vec<TypeName>,
        type_name: &TypeName,
        dependencies: &[TypeName],
    ) -> DependencyResult<()> {
        for dependency in dependencies {
            if path.contains(dependency) {
                return Err(DependencyError::CyclicDependency {
                    dependent: type_name.clone(),
                    dependency: dependency.clone(),
                });
            }

            if !graph.contains(dependency.as_str()) {
                self.build_at(graph, path, dependency)?;
            }
        }
        Ok(())
    }

    /// 构造函数参数类型，未声明构造函数时为空
    fn constructor_dependencies(&self, type_name: &TypeName) -> DependencyResult<Vec<TypeName>> {
        if !self.introspector.has_constructor(type_name) {
            return Ok(Vec::new());
        }

        if !self.introspector.is_constructor_public(type_name) {
            return Err(DependencyError::InvalidConstructor {
                type_name: type_name.clone(),
                issue: ConstructorIssue::NotPublic,
            });
        }

        self.introspector
            .constructor_signature(type_name)
            .into_iter()
            .enumerate()
            .map(|(index, (name, parameter_type))| {
                parameter_type.ok_or_else(|| DependencyError::InvalidConstructor {
                    type_name: type_name.clone(),
                    issue: ConstructorIssue::UnresolvableParameter {
                        position: index + 1,
                        name,
                    },
                })
            })
            .collect()
    }
}
