use anyhow::Result;
use shopflow::testing::*;
use shopflow::*;

fn trips() -> Vec<(String, u64)> {
    vec![
        ("c1".to_string(), 2124),
        ("c2".to_string(), 1418),
        ("c3".to_string(), 549),
        ("c4".to_string(), 104),
        ("c5".to_string(), 87),
        ("c6".to_string(), 3),
    ]
}

#[test]
fn top_k_by_returns_largest_first() -> Result<()> {
    let p = TestPipeline::new();
    let rows = from_vec(&p, shuffled(trips(), 4));
    for ctx in partition_grid() {
        let top = rows.top_k_by(&ctx, 3, |(_, n)| *n)?;
        assert_collections_equal(&top, &trips()[..3]);
    }
    Ok(())
}

#[test]
fn k_bounds() -> Result<()> {
    let p = TestPipeline::new();
    let rows = from_vec(&p, trips());
    let ctx = ExecutionContext::parallel().with_partitions(4);
    assert!(rows.top_k_by(&ctx, 0, |(_, n)| *n)?.is_empty());
    assert_eq!(rows.top_k_by(&ctx, 100, |(_, n)| *n)?.len(), 6);

    let empty = from_vec(&p, Vec::<(String, u64)>::new());
    assert!(empty.top_k_by(&ctx, 5, |(_, n)| *n)?.is_empty());
    Ok(())
}

#[test]
fn larger_k_extends_smaller_k() -> Result<()> {
    let p = TestPipeline::new();
    let rows = from_vec(&p, shuffled((0..300u64).map(|i| (i, i * 7 % 101)).collect(), 8));
    let ctx = ExecutionContext::parallel().with_partitions(7);
    let mut prev: Vec<u64> = Vec::new();
    for k in [1usize, 5, 20, 300] {
        let keys: Vec<u64> = rows.top_k_by(&ctx, k, |(_, v)| *v)?.iter().map(|(_, v)| *v).collect();
        assert_eq!(keys.len(), k);
        assert!(keys.windows(2).all(|w| w[0] >= w[1]));
        // the ranking keys of a shorter prefix never change, even across ties
        assert_eq!(&keys[..prev.len()], prev.as_slice());
        prev = keys;
    }
    Ok(())
}

#[test]
fn ties_only_constrain_the_key() -> Result<()> {
    let p = TestPipeline::new();
    let rows = from_vec(
        &p,
        vec![("a".to_string(), 5u64), ("b".to_string(), 9), ("c".to_string(), 5), ("d".to_string(), 1)],
    );
    let top = rows.top_k_by(&ExecutionContext::parallel().with_partitions(3), 2, |(_, n)| *n)?;
    assert_eq!(top[0], ("b".to_string(), 9));
    assert_eq!(top[1].1, 5);
    assert!(top[1].0 == "a" || top[1].0 == "c");
    Ok(())
}

#[test]
fn top_k_over_explicitly_sorted_groups() -> Result<()> {
    let p = TestPipeline::new();
    let grouped = from_vec(&p, vec![(1u32, 'a'), (3, 'b'), (2, 'c'), (3, 'd')])
        .group_by_key()
        .sort_by_key(false);
    let first = grouped.top_k(&ExecutionContext::sequential(), 2)?;
    assert_eq!(first, vec!['a', 'c']);
    Ok(())
}
