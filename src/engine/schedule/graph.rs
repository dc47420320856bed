// ==========================================
// 阶段依赖图
// ==========================================
// 职责: 合并依赖声明 / 环路检测 / 拓扑排序 / 开工周计算
// 红线: 存在环路时拒绝构建,不产生未定义顺序
// ==========================================

use crate::domain::schedule::{ConstructionStage, StageDependency, StageTemplate};
use crate::engine::error::{EngineError, EngineResult};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// 合并模板的 predecessors / successors 为统一边集
pub fn collect_edges(templates: &[StageTemplate]) -> EngineResult<BTreeSet<StageDependency>> {
    let names: HashSet<&str> = templates.iter().map(|t| t.stage_name.as_str()).collect();
    let mut edges = BTreeSet::new();

    for template in templates {
        for pred in &template.predecessors {
            if !names.contains(pred.as_str()) {
                return Err(EngineError::unknown_stage(pred, &template.stage_name));
            }
            edges.insert(StageDependency::new(pred.clone(), template.stage_name.clone()));
        }
        for succ in &template.successors {
            if !names.contains(succ.as_str()) {
                return Err(EngineError::unknown_stage(succ, &template.stage_name));
            }
            edges.insert(StageDependency::new(template.stage_name.clone(), succ.clone()));
        }
    }

    Ok(edges)
}

fn adjacency(edges: &BTreeSet<StageDependency>) -> BTreeMap<&str, Vec<&str>> {
    let mut adj: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for edge in edges {
        adj.entry(edge.predecessor.as_str())
            .or_default()
            .push(edge.successor.as_str());
    }
    adj
}

/// 环路检测 (DFS)
///
/// 发现环路时返回 InvalidDependencyGraph,stages 为环上阶段 (首尾相同)
pub fn validate_dependency_graph(
    names: &[String],
    edges: &BTreeSet<StageDependency>,
) -> EngineResult<()> {
    let adj = adjacency(edges);

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for name in names {
        if !visited.contains(name.as_str())
            && has_cycle_dfs(name.as_str(), &adj, &mut visited, &mut rec_stack, &mut path)
        {
            return Err(EngineError::cycle(path));
        }
    }

    Ok(())
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &BTreeMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<String>,
) -> bool {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node.to_string());

    if let Some(next) = adj.get(node) {
        for &succ in next {
            if !visited.contains(succ) {
                if has_cycle_dfs(succ, adj, visited, rec_stack, path) {
                    return true;
                }
            } else if rec_stack.contains(succ) {
                // 只保留环上部分
                if let Some(start) = path.iter().position(|n| n.as_str() == succ) {
                    path.drain(..start);
                }
                path.push(succ.to_string());
                return true;
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    false
}

/// 拓扑排序 (Kahn),同层按 names 原顺序
pub fn topological_order(
    names: &[String],
    edges: &BTreeSet<StageDependency>,
) -> EngineResult<Vec<String>> {
    validate_dependency_graph(names, edges)?;

    let index: HashMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();
    let mut in_degree = vec![0usize; names.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); names.len()];

    for edge in edges {
        let p = index
            .get(edge.predecessor.as_str())
            .copied()
            .ok_or_else(|| EngineError::unknown_stage(&edge.predecessor, &edge.successor))?;
        let s = index
            .get(edge.successor.as_str())
            .copied()
            .ok_or_else(|| EngineError::unknown_stage(&edge.successor, &edge.predecessor))?;
        successors[p].push(s);
        in_degree[s] += 1;
    }

    let mut ready: BTreeSet<usize> = (0..names.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(names.len());

    while let Some(i) = ready.pop_first() {
        order.push(names[i].clone());
        for &s in &successors[i] {
            in_degree[s] -= 1;
            if in_degree[s] == 0 {
                ready.insert(s);
            }
        }
    }

    if order.len() != names.len() {
        let remaining = names
            .iter()
            .enumerate()
            .filter(|(i, _)| in_degree[*i] > 0)
            .map(|(_, n)| n.clone())
            .collect();
        return Err(EngineError::cycle(remaining));
    }

    Ok(order)
}

/// 剔除阶段后的依赖桥接
///
/// 保留阶段之间若经由被剔除阶段相连,补一条直接边
pub fn bridge_edges(
    edges: &BTreeSet<StageDependency>,
    kept: &HashSet<&str>,
) -> BTreeSet<StageDependency> {
    let adj = adjacency(edges);
    let mut bridged = BTreeSet::new();

    for &start in kept {
        let mut stack: Vec<&str> = adj.get(start).cloned().unwrap_or_default();
        let mut seen: HashSet<&str> = HashSet::new();

        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                continue;
            }
            if kept.contains(node) {
                bridged.insert(StageDependency::new(start, node));
            } else if let Some(next) = adj.get(node) {
                stack.extend(next.iter().copied());
            }
        }
    }

    bridged
}

/// 计算开工周并回写前置/后续,阶段按拓扑序 + 开工周升序重排
///
/// start = max(base_week, min_start_week, max(pred.start + pred.duration))
pub fn apply_timing(
    stages: &mut Vec<ConstructionStage>,
    edges: &BTreeSet<StageDependency>,
    base_week: u32,
) -> EngineResult<()> {
    let names: Vec<String> = stages.iter().map(|s| s.stage_name.clone()).collect();
    let order = topological_order(&names, edges)?;

    let mut by_name: HashMap<String, ConstructionStage> = std::mem::take(stages)
        .into_iter()
        .map(|s| (s.stage_name.clone(), s))
        .collect();

    let mut predecessors: HashMap<&str, Vec<String>> = HashMap::new();
    let mut successors: HashMap<&str, Vec<String>> = HashMap::new();
    for edge in edges {
        predecessors
            .entry(edge.successor.as_str())
            .or_default()
            .push(edge.predecessor.clone());
        successors
            .entry(edge.predecessor.as_str())
            .or_default()
            .push(edge.successor.clone());
    }

    let mut end_weeks: HashMap<String, u32> = HashMap::new();
    let mut ordered = Vec::with_capacity(order.len());

    for name in &order {
        let Some(mut stage) = by_name.remove(name) else {
            continue;
        };
        let preds = predecessors.get(name.as_str()).cloned().unwrap_or_default();
        let after_preds = preds
            .iter()
            .filter_map(|p| end_weeks.get(p).copied())
            .max()
            .unwrap_or(0);

        stage.relative_start_week = base_week
            .max(stage.min_start_week.unwrap_or(0))
            .max(after_preds);
        stage.predecessors = preds;
        stage.successors = successors.get(name.as_str()).cloned().unwrap_or_default();

        end_weeks.insert(name.clone(), stage.end_week());
        ordered.push(stage);
    }

    // 稳定排序,前置阶段开工周不晚于后续阶段,拓扑序保持
    ordered.sort_by_key(|s| s.relative_start_week);
    *stages = ordered;
    Ok(())
}
