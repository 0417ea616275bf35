use strata::order::{SortEntry, SortOptions, SortResult, sort};

fn entry(v: &[&str], i: usize, barycenter: Option<f64>, weight: Option<f64>) -> SortEntry {
    SortEntry {
        vs: v.iter().map(|s| s.to_string()).collect(),
        i,
        barycenter,
        weight,
        fixorder: None,
        order: None,
    }
}

fn vs(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn sort_sorts_nodes_by_barycenter() {
    let input = vec![
        entry(&["a"], 0, Some(2.0), Some(3.0)),
        entry(&["b"], 1, Some(1.0), Some(2.0)),
    ];
    assert_eq!(
        sort(input, SortOptions::default()),
        SortResult {
            vs: vs(&["b", "a"]),
            barycenter: Some((2.0 * 3.0 + 1.0 * 2.0) / (3.0 + 2.0)),
            weight: Some(5.0),
        }
    );
}

#[test]
fn sort_can_sort_super_nodes() {
    let input = vec![
        entry(&["a", "c", "d"], 0, Some(2.0), Some(3.0)),
        entry(&["b"], 1, Some(1.0), Some(2.0)),
    ];
    let result = sort(input, SortOptions::default());
    assert_eq!(result.vs, vs(&["b", "a", "c", "d"]));
    assert_eq!(result.weight, Some(5.0));
}

#[test]
fn sort_biases_to_the_left_by_default() {
    let input = vec![
        entry(&["a"], 0, Some(1.0), Some(1.0)),
        entry(&["b"], 1, Some(1.0), Some(1.0)),
    ];
    let result = sort(input, SortOptions::default());
    assert_eq!(result.vs, vs(&["a", "b"]));
    assert_eq!((result.barycenter, result.weight), (Some(1.0), Some(2.0)));
}

#[test]
fn sort_biases_to_the_right_if_bias_right_is_set() {
    let input = vec![
        entry(&["a"], 0, Some(1.0), Some(1.0)),
        entry(&["b"], 1, Some(1.0), Some(1.0)),
    ];
    let opts = SortOptions {
        bias_right: true,
        ..Default::default()
    };
    assert_eq!(sort(input, opts).vs, vs(&["b", "a"]));
}

#[test]
fn sort_keeps_nodes_without_a_barycenter_in_place() {
    let input = vec![
        entry(&["a"], 0, Some(2.0), Some(1.0)),
        entry(&["b"], 1, Some(6.0), Some(1.0)),
        entry(&["c"], 2, None, None),
        entry(&["d"], 3, Some(3.0), Some(1.0)),
    ];
    let result = sort(input, SortOptions::default());
    assert_eq!(result.vs, vs(&["a", "d", "c", "b"]));
    assert_eq!(result.barycenter, Some((2.0 + 6.0 + 3.0) / 3.0));
    assert_eq!(result.weight, Some(3.0));
}

#[test]
fn sort_handles_no_barycenters_at_all() {
    let input = vec![
        entry(&["a"], 0, None, None),
        entry(&["b"], 3, None, None),
        entry(&["c"], 2, None, None),
        entry(&["d"], 1, None, None),
    ];
    let result = sort(input, SortOptions::default());
    assert_eq!(result.vs, vs(&["a", "d", "c", "b"]));
    assert_eq!((result.barycenter, result.weight), (None, None));
}

#[test]
fn sort_handles_a_barycenter_of_0() {
    let input = vec![
        entry(&["a"], 0, Some(0.0), Some(1.0)),
        entry(&["b"], 3, None, None),
        entry(&["c"], 2, None, None),
        entry(&["d"], 1, None, None),
    ];
    let result = sort(input, SortOptions::default());
    assert_eq!(result.vs, vs(&["a", "d", "c", "b"]));
    assert_eq!((result.barycenter, result.weight), (Some(0.0), Some(1.0)));
}

#[test]
fn sort_uses_fixorder_ahead_of_barycenter() {
    let mut b = entry(&["b"], 1, None, None);
    b.fixorder = Some(0);
    let input = vec![entry(&["a"], 0, Some(5.0), Some(1.0)), b];
    let result = sort(input, SortOptions::default());
    assert_eq!(result.vs, vs(&["b", "a"]));
    assert_eq!((result.barycenter, result.weight), (Some(5.0), Some(1.0)));
}

#[test]
fn sort_holds_fixed_entries_in_place_when_keeping_node_order() {
    let mut a = entry(&["a"], 0, Some(9.0), Some(1.0));
    a.fixorder = Some(0);
    let input = vec![
        a,
        entry(&["b"], 1, Some(1.0), Some(1.0)),
        entry(&["c"], 2, Some(0.0), Some(1.0)),
    ];
    let opts = SortOptions {
        keep_node_order: true,
        ..Default::default()
    };
    let result = sort(input, opts);
    assert_eq!(result.vs, vs(&["a", "c", "b"]));
    assert_eq!((result.barycenter, result.weight), (Some(0.5), Some(2.0)));
}

#[test]
fn sort_breaks_ties_by_previous_order_when_asked() {
    let mut a = entry(&["a"], 0, Some(1.0), Some(1.0));
    a.order = Some(1);
    let mut b = entry(&["b"], 1, Some(1.0), Some(1.0));
    b.order = Some(0);

    let without = sort(vec![a.clone(), b.clone()], SortOptions::default());
    assert_eq!(without.vs, vs(&["a", "b"]));

    let opts = SortOptions {
        use_prev: true,
        ..Default::default()
    };
    assert_eq!(sort(vec![a, b], opts).vs, vs(&["b", "a"]));
}
