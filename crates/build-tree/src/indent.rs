//! 범용 들여쓰기 트리 빌더
//!
//! 각 라인의 앞부분에 있는 마커 문자(탭, 공백 등)의 개수를 깊이로 보고
//! 입력 순서를 유지하는 n-ary 트리를 구성합니다. 페이로드는 해석하지 않으며,
//! 도메인 해석은 각 빌드 도구 파서가 담당합니다.
//!
//! 노드는 arena(`Vec<IndentNode>`)에 저장되고 [`NodeId`] 인덱스로 서로를 참조하므로
//! 부모/자식 간 참조 순환이 없습니다.
//!
//! # 예시
//!
//! ```
//! use treeline_build_tree::indent::IndentTree;
//!
//! let tree = IndentTree::build(["root", "\tchild", "\t\tgrandchild", "\tsibling"], '\t');
//! let payloads: Vec<&str> = tree.walk().map(|(_, n)| n.payload.as_str()).collect();
//! assert_eq!(payloads, ["root", "child", "grandchild", "sibling"]);
//! ```

/// arena 내 노드 인덱스
pub type NodeId = usize;

/// 들여쓰기 트리 노드
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentNode {
    /// 들여쓰기 접두어를 제거한 라인 내용
    pub payload: String,
    /// 라인 앞 마커 문자 개수
    pub depth: usize,
    /// 자식 노드 (입력 순서)
    pub children: Vec<NodeId>,
    /// 부모 노드 (최상위 노드는 `None`)
    pub parent: Option<NodeId>,
}

/// arena 기반 들여쓰기 트리
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndentTree {
    nodes: Vec<IndentNode>,
    roots: Vec<NodeId>,
}

/// 라인의 들여쓰기 깊이와 내용을 계산합니다.
///
/// 깊이는 첫 번째 비마커/비공백 문자 앞에 있는 `marker` 문자의 개수입니다.
/// 내용이 없는 라인(공백뿐인 라인)은 `None`을 반환합니다.
pub fn indent_depth(line: &str, marker: char) -> Option<(usize, &str)> {
    let mut depth = 0;
    let mut content_start = None;

    for (idx, ch) in line.char_indices() {
        if ch == marker {
            depth += 1;
        } else if !ch.is_whitespace() {
            content_start = Some(idx);
            break;
        }
    }

    let content = line[content_start?..].trim_end();
    Some((depth, content))
}

impl IndentTree {
    /// 라인 목록으로 트리를 구성합니다.
    ///
    /// 깊이 `d`의 라인이 들어오면 스택 최상단의 깊이가 `d`보다 작아질 때까지 pop한 뒤
    /// 새 노드를 그 최상단의 자식으로 push합니다. 스택이 비면 최상위 노드가 됩니다.
    /// 내용이 없는 라인은 노드를 만들지 않고 스택도 건드리지 않습니다.
    pub fn build<I, S>(lines: I, marker: char) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::default();
        let mut stack: Vec<NodeId> = Vec::new();

        for line in lines {
            let Some((depth, content)) = indent_depth(line.as_ref(), marker) else {
                continue;
            };

            while let Some(&top) = stack.last() {
                if tree.nodes[top].depth >= depth {
                    stack.pop();
                } else {
                    break;
                }
            }

            let id = tree.nodes.len();
            let parent = stack.last().copied();
            tree.nodes.push(IndentNode {
                payload: content.to_owned(),
                depth,
                children: Vec::new(),
                parent,
            });

            match parent {
                Some(parent_id) => tree.nodes[parent_id].children.push(id),
                None => tree.roots.push(id),
            }
            stack.push(id);
        }

        tree
    }

    /// 최상위 노드 목록
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// 인덱스로 노드를 조회합니다.
    pub fn get(&self, id: NodeId) -> Option<&IndentNode> {
        self.nodes.get(id)
    }

    /// 전체 노드 수
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 노드가 하나도 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 주어진 노드의 자식 노드를 입력 순서대로 반환합니다.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &IndentNode)> {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&child| (child, &self.nodes[child]))
    }

    /// 깊이 우선(전위) 순회 반복자
    ///
    /// 모든 노드를 정확히 한 번, 부모를 자식보다 먼저, 자식은 입력 순서대로 방문합니다.
    pub fn walk(&self) -> IndentWalk<'_> {
        IndentWalk {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }
}

/// [`IndentTree::walk`] 반복자
pub struct IndentWalk<'a> {
    tree: &'a IndentTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for IndentWalk<'a> {
    type Item = (NodeId, &'a IndentNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id];
        self.stack.extend(node.children.iter().rev());
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads(tree: &IndentTree) -> Vec<&str> {
        tree.walk().map(|(_, n)| n.payload.as_str()).collect()
    }

    #[test]
    fn indent_depth_counts_leading_markers() {
        assert_eq!(indent_depth("\t\tfoo", '\t'), Some((2, "foo")));
        assert_eq!(indent_depth("foo", '\t'), Some((0, "foo")));
        assert_eq!(indent_depth("   bar  ", ' '), Some((3, "bar")));
    }

    #[test]
    fn indent_depth_ignores_non_marker_whitespace() {
        // 마커가 아닌 공백은 깊이에 포함되지 않음
        assert_eq!(indent_depth("\t \tfoo", '\t'), Some((2, "foo")));
    }

    #[test]
    fn indent_depth_rejects_blank_lines() {
        assert_eq!(indent_depth("", '\t'), None);
        assert_eq!(indent_depth("\t\t  ", '\t'), None);
    }

    #[test]
    fn build_nests_by_depth() {
        let tree = IndentTree::build(["a", "\tb", "\t\tc", "\td", "e"], '\t');
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.roots().len(), 2);

        let a = tree.get(tree.roots()[0]).unwrap();
        assert_eq!(a.payload, "a");
        let children: Vec<&str> = tree
            .children(tree.roots()[0])
            .map(|(_, n)| n.payload.as_str())
            .collect();
        assert_eq!(children, ["b", "d"]);
        assert_eq!(payloads(&tree), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn build_skips_blank_lines_without_resetting_stack() {
        let tree = IndentTree::build(["a", "\tb", "", "\t\t", "\t\tc"], '\t');
        assert_eq!(tree.len(), 3);
        let (c_id, c) = tree.walk().last().unwrap();
        assert_eq!(c.payload, "c");
        let parent = tree.get(c.parent.unwrap()).unwrap();
        assert_eq!(parent.payload, "b");
        assert_eq!(tree.get(c_id).unwrap().depth, 2);
    }

    #[test]
    fn build_handles_depth_jumps() {
        // 깊이가 한 번에 여러 단계 증가해도 직전 노드의 자식이 됨
        let tree = IndentTree::build(["a", "\t\t\tb", "\tc"], '\t');
        let a_children: Vec<&str> = tree
            .children(tree.roots()[0])
            .map(|(_, n)| n.payload.as_str())
            .collect();
        assert_eq!(a_children, ["b", "c"]);
    }

    #[test]
    fn build_starting_deep_creates_roots() {
        let tree = IndentTree::build(["\t\ta", "\t\tb", "\t\t\tc"], '\t');
        assert_eq!(tree.roots().len(), 2);
        assert_eq!(tree.get(tree.roots()[1]).unwrap().children.len(), 1);
    }

    #[test]
    fn empty_input_builds_empty_tree() {
        let tree = IndentTree::build(Vec::<String>::new(), '\t');
        assert!(tree.is_empty());
        assert_eq!(tree.walk().count(), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn walk_visits_every_node_once(
                lines in prop::collection::vec((0usize..6, "[a-z]{0,4}"), 0..60)
            ) {
                let input: Vec<String> = lines
                    .iter()
                    .map(|(depth, text)| format!("{}{}", "\t".repeat(*depth), text))
                    .collect();
                let tree = IndentTree::build(&input, '\t');

                let expected = lines.iter().filter(|(_, text)| !text.is_empty()).count();
                prop_assert_eq!(tree.len(), expected);

                let mut seen: Vec<NodeId> = tree.walk().map(|(id, _)| id).collect();
                prop_assert_eq!(seen.len(), expected);
                seen.sort_unstable();
                seen.dedup();
                prop_assert_eq!(seen.len(), expected);
            }

            #[test]
            fn children_are_strictly_deeper_than_parent(
                depths in prop::collection::vec(0usize..8, 1..80)
            ) {
                let input: Vec<String> = depths
                    .iter()
                    .map(|d| format!("{}x", " ".repeat(*d)))
                    .collect();
                let tree = IndentTree::build(&input, ' ');

                for (_, node) in tree.walk() {
                    if let Some(parent) = node.parent.and_then(|p| tree.get(p)) {
                        prop_assert!(parent.depth < node.depth);
                    }
                }
            }
        }
    }
}
