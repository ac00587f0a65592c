//! End-to-end kernel scenarios with literal inputs.

use minframe::kernels::filter::apply_boolean_mask;
use minframe::kernels::gather::gather;
use minframe::kernels::groupby::{GroupByOptions, group_by};
use minframe::kernels::join::hash_join;
use minframe::kernels::merge::merge;
use minframe::{
    Aggregation, AggregationRequest, Array, ArrayV, BooleanArray, FieldArray, JoinKind,
    MaskedArray, NullEquality, NullOrder, OutOfBoundsPolicy, Regex, SortOrder, Table, arr_i32,
    arr_str32,
};

fn table(cols: Vec<(&str, Array)>) -> Table {
    Table::new(
        "t".into(),
        Some(
            cols.into_iter()
                .map(|(n, a)| FieldArray::from_arr(n, a))
                .collect(),
        ),
    )
}

#[test]
fn scenario_filter_with_boolean_mask() {
    let t = table(vec![
        ("a", arr_i32![1, 2, 3, 4, 5]),
        ("b", arr_str32!["x", "y", "z", "w", "v"]),
    ]);
    let mask = ArrayV::from_array(Array::from_bool(BooleanArray::from_slice(&[
        true, false, true, false, true,
    ])));
    let out = apply_boolean_mask(&t.view(), &mask).unwrap();
    assert_eq!(out.n_rows, 3);
    assert_eq!(out.col(0).array.i32().unwrap().data.as_slice(), &[1, 3, 5]);
    let b = out.col(1).array.str32().unwrap();
    assert_eq!(
        (0..3).map(|i| b.get_str(i).unwrap()).collect::<Vec<_>>(),
        vec!["x", "z", "v"]
    );
}

#[test]
fn scenario_gather_with_bounds_check() {
    let t = table(vec![("a", arr_i32![10, 20, 30])]);
    let out = gather(&t.view(), &[2, -1, 0, 5], OutOfBoundsPolicy::Check).unwrap();
    let a = out.col(0).array.i32().unwrap();
    assert_eq!(a.get(0), Some(30));
    assert_eq!(a.get(1), None);
    assert_eq!(a.get(2), Some(10));
    assert_eq!(a.get(3), None);
}

#[test]
fn scenario_stable_merge() {
    let left = table(vec![
        ("k", arr_i32![1, 3, 5]),
        ("v", arr_str32!["a", "b", "c"]),
    ]);
    let right = table(vec![
        ("k", arr_i32![2, 3, 4]),
        ("v", arr_str32!["d", "e", "f"]),
    ]);
    let out = merge(
        &left.view(),
        &right.view(),
        &[0],
        &[SortOrder::Ascending],
        &[NullOrder::After],
    )
    .unwrap();
    assert_eq!(
        out.col(0).array.i32().unwrap().data.as_slice(),
        &[1, 2, 3, 3, 4, 5]
    );
    let v = out.col(1).array.str32().unwrap();
    assert_eq!(
        (0..6).map(|i| v.get_str(i).unwrap()).collect::<Vec<_>>(),
        vec!["a", "d", "b", "e", "f", "c"]
    );
}

#[test]
fn scenario_left_hash_join_with_no_match() {
    let left = table(vec![("k", arr_i32![1, 2, 3])]);
    let right = table(vec![("k", arr_i32![2, 2, 4])]);
    let (l, r) = hash_join(
        &left.view(),
        &right.view(),
        JoinKind::Left,
        NullEquality::Equal,
    )
    .unwrap();
    let mut pairs: Vec<(i32, i32)> = l
        .data
        .iter()
        .zip(r.data.iter())
        .map(|(&a, &b)| (a, b))
        .collect();
    pairs.sort_unstable();
    assert_eq!(pairs, vec![(0, -1), (1, 0), (1, 1), (2, -1)]);
}

#[test]
fn scenario_groupby_sum_and_mean() {
    let mut vals = minframe::IntegerArray::<i32>::with_capacity(5, true);
    vals.push(10);
    vals.push(20);
    vals.push(30);
    vals.push_null();
    vals.push(50);
    let keys = table(vec![("k", arr_i32![1, 1, 2, 2, 3])]);
    let values = table(vec![("v", Array::from_int32(vals))]);
    let result = group_by(
        &keys.view(),
        &values.view(),
        &[AggregationRequest::new(
            0,
            vec![Aggregation::Sum, Aggregation::Mean],
        )],
        &GroupByOptions {
            sort_result: true,
            ..GroupByOptions::default()
        },
    )
    .unwrap();
    assert_eq!(
        result.keys.col(0).array.i32().unwrap().data.as_slice(),
        &[1, 2, 3]
    );
    let sums = result.columns[0][0].i64().unwrap();
    assert_eq!(
        (0..3).map(|i| sums.get(i).unwrap()).collect::<Vec<_>>(),
        vec![30, 30, 50]
    );
    let means = result.columns[0][1].f64().unwrap();
    assert_eq!(
        (0..3).map(|i| means.get(i).unwrap()).collect::<Vec<_>>(),
        vec![15.0, 30.0, 50.0]
    );
}

#[test]
fn scenario_regex_compile_and_match() {
    let re = Regex::new("a(b|c){2,3}d").unwrap();
    assert_eq!(re.find("abccd"), Some((0, 5)));
    // Group 1 reports the last matching alternative.
    assert_eq!(re.extract("abccd", 1), Some((3, 4)));
}
