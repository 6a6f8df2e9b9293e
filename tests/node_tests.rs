use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use subgroup_mcts::{
    Condition, ConditionCatalog, ConditionPath, Dataset, MCTSError, SearchState, SubgroupNode,
    Value,
};

fn accidents() -> Dataset {
    Dataset::new(
        vec![
            "CITY".to_string(),
            "WEATHER".to_string(),
            "PERIOD".to_string(),
            "NUM_ACIDENTES".to_string(),
        ],
        vec![
            vec![Value::from("BH"), Value::from("RAIN"), Value::from("DIA"), Value::Integer(1)],
            vec![Value::from("BH"), Value::from("CLEAR"), Value::from("NOITE"), Value::Integer(1)],
            vec![Value::from("BH"), Value::from("RAIN"), Value::from("NOITE"), Value::Integer(1)],
            vec![Value::from("BH"), Value::from("CLEAR"), Value::from("DIA"), Value::Integer(1)],
            vec![Value::from("BH"), Value::from("RAIN"), Value::from("NOITE"), Value::Integer(1)],
        ],
    )
    .unwrap()
}

fn root_of(data: Dataset) -> SubgroupNode {
    let skip: BTreeSet<String> = ["NUM_ACIDENTES".to_string()].into_iter().collect();
    let catalog = ConditionCatalog::enumerate(&data, &skip).unwrap();
    SubgroupNode::root(data, &catalog, "NUM_ACIDENTES").unwrap()
}

fn hash_of(node: &SubgroupNode) -> u64 {
    let mut hasher = DefaultHasher::new();
    node.hash(&mut hasher);
    hasher.finish()
}

/// Walks every node reachable from `node`, depth first
fn visit_all(node: &SubgroupNode, f: &mut dyn FnMut(&SubgroupNode)) {
    f(node);
    for child in node.expand() {
        visit_all(child, f);
    }
}

#[test]
fn test_root_has_empty_path_and_full_dataset() {
    let root = root_of(accidents());

    assert!(root.conditions().is_empty());
    assert_eq!(root.len(), 5);
    assert_eq!(root.depth(), 0);
    assert!(!root.is_terminal());
    assert_eq!(root.accident_count().unwrap(), 5.0);
}

#[test]
fn test_children_follow_catalog_order() {
    let root = root_of(accidents());
    let paths: Vec<String> = root
        .expand()
        .iter()
        .map(|child| child.conditions().to_string())
        .collect();

    assert_eq!(
        paths,
        vec![
            "[CITY=BH]",
            "[WEATHER=CLEAR]",
            "[WEATHER=RAIN]",
            "[PERIOD=DIA]",
            "[PERIOD=NOITE]",
        ]
    );
}

#[test]
fn test_children_skip_conditions_already_applied() {
    let root = root_of(accidents());
    let rain = &root.expand()[2];
    assert_eq!(rain.conditions().to_string(), "[WEATHER=RAIN]");

    let children = rain.expand();
    assert_eq!(children.len(), 4);
    assert!(children
        .iter()
        .all(|child| child.conditions().len() == 2
            && child.conditions().as_slice()[0] == Condition::new("WEATHER", "RAIN")));
    assert!(!children
        .iter()
        .any(|child| child.conditions().as_slice()[1] == Condition::new("WEATHER", "RAIN")));
}

#[test]
fn test_every_child_is_subset_of_parent() {
    let root = root_of(accidents());
    let mut checked = 0;

    visit_all(&root, &mut |parent| {
        for child in parent.expand() {
            assert!(child.dataset().is_subset_of(parent.dataset()));
            assert!(child.len() <= parent.len());
            assert_eq!(child.conditions().len(), parent.conditions().len() + 1);
            checked += 1;
        }
    });

    assert!(checked > 0);
}

#[test]
fn test_terminal_nodes_have_no_children_and_a_reward() {
    let root = root_of(accidents());
    let mut terminals = 0;

    visit_all(&root, &mut |node| {
        if node.is_terminal() {
            terminals += 1;
            assert!(node.is_empty());
            assert!(node.expand().is_empty());
            assert_eq!(node.reward().unwrap(), 0.0);
        } else {
            assert!(matches!(node.reward(), Err(MCTSError::InvalidState(_))));
        }
    });

    assert!(terminals > 0, "Some conjunction should select no rows");
}

#[test]
fn test_single_valued_condition_keeps_every_row() {
    let root = root_of(accidents());
    let city = &root.expand()[0];

    assert_eq!(city.conditions().to_string(), "[CITY=BH]");
    assert_eq!(city.dataset().row_ids(), root.dataset().row_ids());
    assert!(!city.is_terminal());
    assert!(matches!(city.reward(), Err(MCTSError::InvalidState(_))));
}

#[test]
fn test_evaluate_negates_accident_count() {
    let root = root_of(accidents());
    let rain = &root.expand()[2];

    assert_eq!(rain.accident_count().unwrap(), 3.0);
    assert_eq!(rain.evaluate().unwrap(), -3.0);
    assert_eq!(root.evaluate().unwrap(), -5.0);
}

#[test]
fn test_expand_is_memoized() {
    let root = root_of(accidents());
    assert!(!root.is_expanded());

    let first = root.expand();
    assert!(root.is_expanded());
    let second = root.expand();

    assert!(std::ptr::eq(first.as_ptr(), second.as_ptr()));
    assert_eq!(first, second);

    // Clones share the cache
    let clone = root.clone();
    assert!(std::ptr::eq(clone.expand().as_ptr(), first.as_ptr()));
}

#[test]
fn test_identity_depends_only_on_conditions() {
    let root_a = root_of(accidents());
    let root_b = root_of(accidents());

    assert_eq!(root_a, root_b);
    assert_eq!(hash_of(&root_a), hash_of(&root_b));

    for (a, b) in root_a.expand().iter().zip(root_b.expand()) {
        assert_eq!(a, b);
        assert_eq!(hash_of(a), hash_of(b));
    }

    let rain_then_night = &root_a.expand()[2].expand()[3];
    let night_then_rain = &root_a.expand()[4].expand()[2];
    assert_eq!(
        rain_then_night.conditions(),
        &ConditionPath::from(vec![
            Condition::new("WEATHER", "RAIN"),
            Condition::new("PERIOD", "NOITE"),
        ])
    );
    assert_eq!(
        night_then_rain.conditions(),
        &ConditionPath::from(vec![
            Condition::new("PERIOD", "NOITE"),
            Condition::new("WEATHER", "RAIN"),
        ])
    );
    // Same rows, different paths: distinct states
    assert_eq!(
        rain_then_night.dataset().row_ids(),
        night_then_rain.dataset().row_ids()
    );
    assert_ne!(rain_then_night, night_then_rain);
}

#[test]
fn test_empty_dataset_root_is_terminal() {
    let data = Dataset::empty(vec!["WEATHER".to_string(), "NUM_ACIDENTES".to_string()]).unwrap();
    let root = root_of(data);

    assert!(root.is_terminal());
    assert!(root.expand().is_empty());
    assert_eq!(root.reward().unwrap(), 0.0);
}

#[test]
fn test_empty_catalog_leaves_nonterminal_root_childless() {
    let root = SubgroupNode::root(accidents(), &ConditionCatalog::default(), "NUM_ACIDENTES")
        .unwrap();

    assert!(!root.is_terminal());
    assert!(root.expand().is_empty());
    assert!(root.sample_child(&mut rand::thread_rng()).is_none());
}

#[test]
fn test_root_validates_columns() {
    let catalog = ConditionCatalog::from_conditions(vec![Condition::new("DESC_TEMPO", "CHUVOSO")]);
    assert!(matches!(
        SubgroupNode::root(accidents(), &catalog, "NUM_ACIDENTES"),
        Err(MCTSError::UnknownColumn(c)) if c == "DESC_TEMPO"
    ));

    assert!(matches!(
        SubgroupNode::root(accidents(), &ConditionCatalog::default(), "DEATHS"),
        Err(MCTSError::UnknownColumn(c)) if c == "DEATHS"
    ));
}

#[test]
fn test_hand_picked_catalog() {
    let catalog = ConditionCatalog::from_conditions(vec![
        Condition::new("WEATHER", "RAIN"),
        Condition::new("PERIOD", "NOITE"),
    ]);
    let root = SubgroupNode::root(accidents(), &catalog, "NUM_ACIDENTES").unwrap();

    assert_eq!(root.expand().len(), 2);
    let rain_night = &root.expand()[0].expand()[0];
    assert_eq!(rain_night.len(), 2);

    // Both conditions applied and rows remain: nothing left to refine with
    assert!(!rain_night.is_terminal());
    assert!(rain_night.expand().is_empty());
}
