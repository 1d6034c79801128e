//! 도메인 타입 -- 정규 의존성 트리 모델
//!
//! Maven, Gradle, SBT 파서는 모두 [`DependencyNode`] 트리를 생성합니다.
//! 각 노드의 `from` 필드는 트리 루트부터 해당 노드까지의 경로
//! (`"name@version"` 목록)이며, 취약점 경로 보고의 기준이 됩니다.
//!
//! # 불변식
//!
//! - `from`은 비어 있지 않으며 마지막 원소는 `"{name}@{version}"`
//! - 자식의 `from` = 부모의 `from` + 자식 자신의 `"name@version"`
//! - 어떤 노드도 자기 자신의 조상이 될 수 없음

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Maven/Gradle 트리에 붙는 패키지 형식 버전 태그
pub const PACKAGE_FORMAT_VERSION: &str = "mvn:0.0.1";

/// 자식 이름 → 자식 노드 매핑
///
/// 최초 삽입 순서를 유지하며, 같은 이름을 다시 삽입하면 값만 교체됩니다 (last writer wins).
pub type DependencyMap = IndexMap<String, DependencyNode>;

/// 의존성 트리를 출력하는 빌드 도구
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildTool {
    /// `mvn dependency:tree -DoutputType=dot`
    Maven,
    /// `gradle dependencies -q`
    Gradle,
    /// `sbt dependency-tree`
    Sbt,
}

impl BuildTool {
    /// 메트릭 레이블 등에 사용하는 정적 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maven => "maven",
            Self::Gradle => "gradle",
            Self::Sbt => "sbt",
        }
    }

    /// 문자열에서 빌드 도구를 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "maven" | "mvn" => Some(Self::Maven),
            "gradle" | "gradlew" => Some(Self::Gradle),
            "sbt" | "scala" => Some(Self::Sbt),
            _ => None,
        }
    }
}

impl fmt::Display for BuildTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 정규 의존성 트리 노드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    /// 패키지 이름 (보통 `groupId:artifactId`)
    pub name: String,
    /// 해석된(resolved) 버전
    pub version: String,
    /// Maven 좌표 groupId
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Maven 좌표 artifactId
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    /// 직접 의존성 (이름 → 노드)
    #[serde(default)]
    pub dependencies: DependencyMap,
    /// 루트부터 이 노드까지의 경로 (`name@version` 목록, 자기 자신 포함)
    pub from: Vec<String>,
    /// 의존성 스코프 (Maven 전용, 예: `test`, `provided`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// 버전 제약/범위 (Maven `selected from constraint` 주석)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dep: Option<String>,
    /// 패키지 형식 버전 태그 (루트 노드 전용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_format_version: Option<String>,
}

impl DependencyNode {
    /// 부모 경로 아래에 새 노드를 생성합니다.
    ///
    /// `parent_from`이 비어 있으면 이 노드가 루트가 됩니다.
    pub fn new(name: impl Into<String>, version: impl Into<String>, parent_from: &[String]) -> Self {
        let name = name.into();
        let version = version.into();
        let mut from = Vec::with_capacity(parent_from.len() + 1);
        from.extend_from_slice(parent_from);
        from.push(format!("{name}@{version}"));

        Self {
            name,
            version,
            group_id: None,
            artifact_id: None,
            dependencies: DependencyMap::new(),
            from,
            scope: None,
            dep: None,
            package_format_version: None,
        }
    }

    /// groupId/artifactId 좌표를 설정합니다.
    pub fn with_coordinates(
        mut self,
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
    ) -> Self {
        self.group_id = Some(group_id.into());
        self.artifact_id = Some(artifact_id.into());
        self
    }

    /// 이 노드의 `"name@version"` 키를 반환합니다.
    pub fn coordinate_key(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    /// 새 부모 경로 아래로 옮긴 깊은 복사본을 반환합니다.
    ///
    /// 하위 트리의 모든 `from` 체인이 새 위치 기준으로 다시 계산됩니다.
    pub fn rebased(&self, parent_from: &[String]) -> Self {
        let mut node = Self {
            dependencies: DependencyMap::with_capacity(self.dependencies.len()),
            from: Vec::with_capacity(parent_from.len() + 1),
            ..self.clone_shallow()
        };
        node.from.extend_from_slice(parent_from);
        node.from.push(self.coordinate_key());

        for (name, child) in &self.dependencies {
            let child = child.rebased(&node.from);
            node.dependencies.insert(name.clone(), child);
        }
        node
    }

    /// 루트 노드가 없는 의존성 모음(Gradle)을 합성 루트로 감쌉니다.
    pub fn wrap_root(
        name: impl Into<String>,
        version: impl Into<String>,
        dependencies: &DependencyMap,
    ) -> Self {
        let mut root = Self::new(name, version, &[]);
        for (key, child) in dependencies {
            let child = child.rebased(&root.from);
            root.dependencies.insert(key.clone(), child);
        }
        root
    }

    /// 깊이 우선(전위) 순회 반복자를 반환합니다.
    ///
    /// 부모가 자식보다 먼저, 자식은 삽입 순서대로 방문합니다.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// 자기 자신을 포함한 전체 노드 수
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// 트리 최대 깊이 (루트만 있으면 1)
    pub fn max_depth(&self) -> usize {
        let base = self.from.len().saturating_sub(1);
        self.walk()
            .map(|n| n.from.len().saturating_sub(base))
            .max()
            .unwrap_or(0)
    }

    /// 이름이 `name`인 모든 노드의 루트부터의 경로를 반환합니다.
    pub fn find_paths(&self, name: &str) -> Vec<&[String]> {
        self.walk()
            .filter(|n| n.name == name)
            .map(|n| n.from.as_slice())
            .collect()
    }

    /// 트리 전체가 `from` 불변식과 비순환 조건을 만족하는지 검사합니다.
    pub fn is_consistent(&self) -> bool {
        fn check(node: &DependencyNode) -> bool {
            if node.from.last() != Some(&node.coordinate_key()) {
                return false;
            }
            let ancestors = &node.from[..node.from.len() - 1];
            if ancestors
                .iter()
                .any(|entry| entry.rsplit_once('@').is_some_and(|(n, _)| n == node.name))
            {
                return false;
            }
            node.dependencies.values().all(|child| {
                child.from.len() == node.from.len() + 1
                    && child.from[..node.from.len()] == node.from[..]
                    && check(child)
            })
        }
        check(self)
    }

    fn clone_shallow(&self) -> Self {
        Self {
            name: self.name.clone(),
            version: self.version.clone(),
            group_id: self.group_id.clone(),
            artifact_id: self.artifact_id.clone(),
            dependencies: DependencyMap::new(),
            from: Vec::new(),
            scope: self.scope.clone(),
            dep: self.dep.clone(),
            package_format_version: self.package_format_version.clone(),
        }
    }
}

impl fmt::Display for DependencyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)?;
        if let Some(scope) = &self.scope {
            write!(f, " ({scope})")?;
        }
        Ok(())
    }
}

/// [`DependencyNode::walk`] 반복자
pub struct Walk<'a> {
    stack: Vec<&'a DependencyNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a DependencyNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.dependencies.values().rev());
        Some(node)
    }
}
