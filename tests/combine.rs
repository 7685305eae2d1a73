use anyhow::Result;
use shopflow::combiners::check_combiner_laws;
use shopflow::testing::*;
use shopflow::*;

/// Values are quarters, so every partial sum is exact and results compare with `==`.
fn spend_rows() -> Vec<(String, f64)> {
    (0..240u32)
        .map(|i| (format!("c{}", i % 9), f64::from(i % 17) * 0.25))
        .collect()
}

fn expected_sums(rows: &[(String, f64)]) -> Vec<(String, f64)> {
    let mut m = std::collections::BTreeMap::<String, f64>::new();
    for (k, v) in rows {
        *m.entry(k.clone()).or_default() += v;
    }
    m.into_iter().collect()
}

#[test]
fn combine_is_independent_of_partitioning_and_order() -> Result<()> {
    let rows = spend_rows();
    let expected = expected_sums(&rows);
    for seed in [0u32, 1, 2] {
        let p = TestPipeline::new();
        let sums = from_vec(&p, shuffled(rows.clone(), seed))
            .combine_by_key_fns(|v: f64| v, |acc: f64, v: f64| acc + v, |a: f64, b: f64| a + b)
            .sort_by_key(false);
        for ctx in partition_grid() {
            assert_eq!(sums.collect(&ctx)?, expected, "seed {seed}, {ctx:?}");
        }
    }
    Ok(())
}

#[test]
fn builtin_combiners() -> Result<()> {
    let p = TestPipeline::new();
    let kv = from_vec(
        &p,
        vec![("a".to_string(), 4u64), ("b".to_string(), 2), ("a".to_string(), 9), ("a".to_string(), 1)],
    );
    for ctx in partition_grid() {
        assert_kv_collections_equal(
            kv.clone().combine_by_key(Sum::new()).collect(&ctx)?,
            vec![("a".to_string(), 14), ("b".to_string(), 2)],
        );
        assert_kv_collections_equal(
            kv.clone().combine_by_key(Count).collect(&ctx)?,
            vec![("a".to_string(), 3), ("b".to_string(), 1)],
        );
        assert_kv_collections_equal(
            kv.clone().combine_by_key(Max::new()).collect(&ctx)?,
            vec![("a".to_string(), 9), ("b".to_string(), 2)],
        );
        assert_kv_collections_equal(
            kv.clone().reduce_by_key(|a, b| a.min(b)).collect(&ctx)?,
            vec![("a".to_string(), 1), ("b".to_string(), 2)],
        );
    }
    Ok(())
}

#[test]
fn average_is_mean_of_all_values() -> Result<()> {
    let p = TestPipeline::new();
    let rows = vec![("x".to_string(), 10.0f64), ("x".to_string(), 8.0), ("y".to_string(), 1.5)];
    let avg = from_vec(&p, rows).combine_by_key(AverageF64);
    for ctx in partition_grid() {
        assert_kv_close(avg.collect(&ctx)?, vec![("x".to_string(), 9.0), ("y".to_string(), 1.5)], 1e-12);
    }
    Ok(())
}

#[test]
fn average_of_partial_means_would_be_wrong() -> Result<()> {
    // Three values for one key: a mean of per-partition means differs from the true mean
    // whenever partitions hold unequal counts, so this checks the sum-count path.
    let p = TestPipeline::new();
    let rows = vec![("k".to_string(), 1.0f64), ("k".to_string(), 2.0), ("k".to_string(), 6.0)];
    let avg = from_vec(&p, rows).combine_by_key(AverageF64);
    for ctx in partition_grid() {
        assert_kv_close(avg.collect(&ctx)?, vec![("k".to_string(), 3.0)], 1e-12);
    }
    Ok(())
}

#[test]
fn combine_on_empty_input_is_empty() -> Result<()> {
    let p = TestPipeline::new();
    let empty = from_vec(&p, Vec::<(u32, f64)>::new()).combine_by_key(AverageF64);
    for ctx in partition_grid() {
        assert!(empty.collect(&ctx)?.is_empty());
    }
    Ok(())
}

#[test]
fn builtin_combiners_obey_the_laws() {
    check_combiner_laws(&Sum::<u64>::new(), &[3, 1, 4, 1, 5]);
    check_combiner_laws(&Count, &["a", "b", "c", "d"]);
    check_combiner_laws(&Max::<i32>::new(), &[-3, 7, 2, 7]);
    check_combiner_laws(&AverageF64, &[0.5f64, 1.25, 2.0, 4.0]);
}

#[test]
#[should_panic(expected = "differs at split")]
fn law_check_catches_non_associative_merge() {
    let minus = FnCombiner::new(|v: i64| v, |acc: i64, v: i64| acc - v, |a: i64, b: i64| a - b);
    check_combiner_laws(&minus, &[10, 3, 2]);
}
