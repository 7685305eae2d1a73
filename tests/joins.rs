use anyhow::Result;
use shopflow::testing::*;
use shopflow::*;

#[test]
fn inner_join_emits_cross_product_per_key() -> Result<()> {
    let p = TestPipeline::new();
    let left = from_vec(
        &p,
        vec![("a".to_string(), 1u32), ("b".to_string(), 2), ("a".to_string(), 3)],
    );
    let right = from_vec(
        &p,
        vec![
            ("a".to_string(), 10i32),
            ("c".to_string(), 30),
            ("a".to_string(), 40),
            ("b".to_string(), 20),
        ],
    );

    let joined = left.join_inner(&right);
    let expected = vec![
        ("a".to_string(), (1u32, 10i32)),
        ("a".to_string(), (1u32, 40i32)),
        ("a".to_string(), (3u32, 10i32)),
        ("a".to_string(), (3u32, 40i32)),
        ("b".to_string(), (2u32, 20i32)),
    ];
    for ctx in partition_grid() {
        assert_eq!(joined.collect_sorted(&ctx)?, expected);
    }
    Ok(())
}

#[test]
fn disjoint_keys_join_to_nothing() -> Result<()> {
    let p = TestPipeline::new();
    let left = from_vec(&p, vec![(1u32, "x".to_string()), (2, "y".to_string())]);
    let right = from_vec(&p, vec![(3u32, 'p'), (4, 'q')]);
    for ctx in partition_grid() {
        assert!(left.join_inner(&right).collect(&ctx)?.is_empty());
    }
    Ok(())
}

#[test]
fn empty_side_joins_to_nothing() -> Result<()> {
    let p = TestPipeline::new();
    let left = from_vec(&p, vec![(1u32, 1u32)]);
    let right = from_vec(&p, Vec::<(u32, u32)>::new());
    assert!(left.join_inner(&right).collect_par(None, Some(4))?.is_empty());
    assert!(right.join_inner(&left).collect_seq()?.is_empty());
    Ok(())
}

#[test]
fn join_is_commutative_up_to_swap() -> Result<()> {
    let p = TestPipeline::new();
    let left = from_vec(&p, shuffled((0..60u32).map(|i| (i % 7, i)).collect(), 1));
    let right = from_vec(&p, shuffled((0..40u32).map(|i| (i % 5, i * 10)).collect(), 2));
    let ctx = ExecutionContext::parallel().with_partitions(5);

    let lr = left.join_inner(&right).collect_sorted(&ctx)?;
    let rl = right
        .join_inner(&left)
        .map(|(k, (w, v))| (*k, (*v, *w)))
        .collect_sorted(&ctx)?;
    assert_eq!(lr, rl);
    // keys 0..5 appear on both sides: 9 or 8 left rows times 8 right rows each
    let expected: usize = (0..5u32)
        .map(|k| (0..60).filter(|i| i % 7 == k).count() * 8)
        .sum();
    assert_eq!(lr.len(), expected);
    Ok(())
}

#[test]
fn join_on_extracts_keys() -> Result<()> {
    #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
    struct Order {
        user: u32,
        item: String,
    }

    let p = TestPipeline::new();
    let orders = from_vec(
        &p,
        vec![
            Order { user: 1, item: "pen".into() },
            Order { user: 2, item: "ink".into() },
            Order { user: 1, item: "pad".into() },
        ],
    );
    let users = from_vec(&p, vec![(1u32, "ann".to_string()), (3, "cat".to_string())]);

    let joined = orders.join_on(&users, |o| o.user, |u| u.0).collect_seq_sorted()?;
    let items: Vec<&str> = joined.iter().map(|(_, (o, _))| o.item.as_str()).collect();
    assert_eq!(items, vec!["pad", "pen"]);
    assert!(joined.iter().all(|(k, (o, u))| *k == 1 && o.user == 1 && u.1 == "ann"));
    Ok(())
}

#[test]
fn join_feeds_further_stages() -> Result<()> {
    let p = TestPipeline::new();
    let left = from_vec(&p, vec![("a".to_string(), 1u64), ("a".to_string(), 2), ("b".to_string(), 5)]);
    let right = from_vec(&p, vec![("a".to_string(), 10u64), ("b".to_string(), 1), ("b".to_string(), 2)]);

    let totals = left
        .join_inner(&right)
        .map_values(|(v, w)| v * w)
        .combine_by_key(Sum::new())
        .sort_by_key(false);
    for ctx in partition_grid() {
        assert_eq!(totals.collect(&ctx)?, vec![("a".to_string(), 30), ("b".to_string(), 15)]);
    }
    Ok(())
}

#[test]
#[should_panic(expected = "same pipeline")]
fn cross_pipeline_join_panics() {
    let a = from_vec(&Pipeline::default(), vec![(1u8, 1u8)]);
    let b = from_vec(&Pipeline::default(), vec![(1u8, 1u8)]);
    let _ = a.join_inner(&b);
}
