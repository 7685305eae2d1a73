use anyhow::Result;
use shopflow::testing::*;
use shopflow::*;

#[test]
fn map_filter_flat_map_seq_par() -> Result<()> {
    let p = TestPipeline::new();
    let words = from_vec(&p, vec!["a b".to_string(), "c".to_string(), String::new(), "d e f".to_string()])
        .flat_map(|line: &String| line.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .filter(|w: &String| w != "c")
        .map(|w: &String| w.to_uppercase());

    let expected: Vec<String> = ["A", "B", "D", "E", "F"].iter().map(|s| (*s).to_string()).collect();
    for ctx in partition_grid() {
        assert_collections_unordered_equal(&words.collect(&ctx)?, &expected);
    }
    Ok(())
}

#[test]
fn collections_are_reusable_branches() -> Result<()> {
    let p = TestPipeline::new();
    let base = from_vec(&p, (1..=10u32).collect::<Vec<_>>());
    let evens = base.clone().filter(|x: &u32| x % 2 == 0);
    let squares = base.map(|x: &u32| x * x);

    assert_eq!(evens.collect_seq_sorted()?, vec![2, 4, 6, 8, 10]);
    assert_eq!(squares.count(&ExecutionContext::parallel().with_partitions(4))?, 10);
    // Running one branch twice gives the same answer.
    assert_eq!(evens.collect_seq_sorted()?, evens.collect_par_sorted(Some(2), Some(3))?);
    Ok(())
}

#[test]
fn empty_source_yields_empty_results() -> Result<()> {
    let p = TestPipeline::new();
    let empty = from_vec(&p, Vec::<(String, u32)>::new());
    for ctx in partition_grid() {
        assert!(empty.collect(&ctx)?.is_empty());
        assert!(empty.clone().group_by_key().collect(&ctx)?.is_empty());
        assert!(empty.clone().sort_by_key(true).first(&ctx)?.is_none());
        assert!(empty.clone().combine_by_key(Count).collect(&ctx)?.is_empty());
    }
    Ok(())
}

#[test]
fn take_and_first_after_sort() -> Result<()> {
    let p = TestPipeline::new();
    let sorted = from_vec(&p, vec![(3u32, 'c'), (1, 'a'), (2, 'b')]).sort_by_key(false);
    let ctx = ExecutionContext::parallel().with_partitions(3);
    assert_eq!(sorted.take(&ctx, 2)?, vec![(1, 'a'), (2, 'b')]);
    assert_eq!(sorted.first(&ctx)?, Some((1, 'a')));
    assert_eq!(sorted.take(&ctx, 10)?.len(), 3);
    assert!(sorted.take(&ctx, 0)?.is_empty());
    Ok(())
}

#[test]
fn values_helpers() -> Result<()> {
    let p = TestPipeline::new();
    let kv = from_vec(&p, vec![("a".to_string(), 1u32), ("b".to_string(), 2), ("a".to_string(), 3)]);

    let doubled = kv.clone().map_values(|v: &u32| v * 2).filter_values(|v: &u32| *v > 2);
    assert_kv_collections_equal(doubled.collect_seq()?, vec![("a".to_string(), 6), ("b".to_string(), 4)]);
    assert_eq!(kv.clone().keys().collect_seq_sorted()?, vec!["a".to_string(), "a".to_string(), "b".to_string()]);
    assert_eq!(kv.values().collect_seq_sorted()?, vec![1, 2, 3]);
    Ok(())
}

#[test]
fn dedicated_thread_pool() -> Result<()> {
    let p = TestPipeline::new();
    let out = from_vec(&p, (0..1000u64).collect::<Vec<_>>())
        .map(|x: &u64| x + 1)
        .collect(&ExecutionContext::parallel().with_threads(2).with_partitions(8))?;
    assert_eq!(out.iter().sum::<u64>(), (1..=1000u64).sum::<u64>());
    Ok(())
}

#[test]
fn graph_records_every_transformation() {
    let p = TestPipeline::new();
    let a = from_vec(&p, vec![(1u8, 1u8)]);
    let b = from_vec(&p, vec![(1u8, 2u8)]);
    assert_eq!(b.node_id().raw(), a.node_id().raw() + 1);
    let _ = a.clone().map_values(|v: &u8| v + 1).join_inner(&b);
    // two sources, one map, one join
    assert_eq!(p.node_count(), 4);
    // source -> map, map -> join, b -> join
    assert_eq!(p.edge_count(), 3);
}
